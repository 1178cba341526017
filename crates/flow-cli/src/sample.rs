//! Sample data for local previews.

use chrono::{Duration, Utc};
use flow_core::enums::{FlowMeasureStatus, FlowMeasureType};
use flow_core::models::{
    DiscordTag, FlightInformationRegion, FlowFilter, FlowMeasure, NotifiedRegion,
};

/// A representative measure for previewing message layout without a server.
pub fn sample_measure() -> FlowMeasure {
    let start = Utc::now() + Duration::hours(1);
    FlowMeasure {
        id: "sample".to_string(),
        identifier: "EGTT01".to_string(),
        measure_type: FlowMeasureType::MinimumDepartureInterval,
        status: FlowMeasureStatus::Notified,
        reason: "Controller capacity".to_string(),
        start_time: start,
        end_time: start + Duration::hours(2),
        value: None,
        minutes: 2,
        seconds: 0,
        mandatory_route: Vec::new(),
        additional_filters: vec![
            FlowFilter::DepartureAirports(vec!["EG**".to_string()]),
            FlowFilter::ArrivalAirports(vec!["EHAM".to_string()]),
            FlowFilter::LevelBelow(220),
        ],
        flight_information_region_id: "fir-egtt".to_string(),
        event: None,
        user_id: "system".to_string(),
        notified_regions: vec![NotifiedRegion {
            region: FlightInformationRegion {
                id: "fir-ehaa".to_string(),
                identifier: "EHAA".to_string(),
                name: "Amsterdam".to_string(),
            },
            discord_tags: vec![DiscordTag {
                id: "tag-1".to_string(),
                flight_information_region_id: "fir-ehaa".to_string(),
                tag: "<@&1234567890>".to_string(),
            }],
        }],
    }
}
