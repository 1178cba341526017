//! Embed description builder.

use crate::models::FlowMeasure;

/// Build the embed description for a measure: the event display name when
/// the measure is tied to an event, followed by the interested parties.
///
/// Interested parties are the Discord mention tags of every notified
/// region, deduplicated in first-seen order and joined by a space. A region
/// without tags contributes its identifier code instead, so it still shows
/// up in the notification.
pub fn event_name_and_interested_parties(measure: &FlowMeasure) -> String {
    let mut parties: Vec<String> = Vec::new();
    for notified in &measure.notified_regions {
        if notified.discord_tags.is_empty() {
            push_unique(&mut parties, &notified.region.identifier);
        } else {
            for tag in &notified.discord_tags {
                push_unique(&mut parties, &tag.tag);
            }
        }
    }
    let parties = parties.join(" ");

    match &measure.event {
        Some(event) if parties.is_empty() => event.name_date(),
        Some(event) => format!("{}\n{}", event.name_date(), parties),
        None => parties,
    }
}

fn push_unique(parties: &mut Vec<String>, party: &str) {
    if !parties.iter().any(|existing| existing == party) {
        parties.push(party.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{FlowMeasureStatus, FlowMeasureType};
    use crate::models::{DiscordTag, Event, FlightInformationRegion, NotifiedRegion};
    use chrono::{TimeZone, Utc};

    fn measure() -> FlowMeasure {
        FlowMeasure {
            id: "m-1".to_string(),
            identifier: "EGTT01".to_string(),
            measure_type: FlowMeasureType::Prohibit,
            status: FlowMeasureStatus::Notified,
            reason: "Testing".to_string(),
            start_time: Utc.with_ymd_and_hms(2022, 5, 22, 14, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2022, 5, 22, 16, 0, 0).unwrap(),
            value: None,
            minutes: 0,
            seconds: 0,
            mandatory_route: Vec::new(),
            additional_filters: Vec::new(),
            flight_information_region_id: "fir-1".to_string(),
            event: None,
            user_id: "user-1".to_string(),
            notified_regions: Vec::new(),
        }
    }

    fn notified(id: &str, identifier: &str, tags: &[&str]) -> NotifiedRegion {
        NotifiedRegion {
            region: FlightInformationRegion {
                id: id.to_string(),
                identifier: identifier.to_string(),
                name: format!("{} Region", identifier),
            },
            discord_tags: tags
                .iter()
                .enumerate()
                .map(|(i, tag)| DiscordTag {
                    id: format!("{}-tag-{}", id, i),
                    flight_information_region_id: id.to_string(),
                    tag: tag.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn lists_tags_of_notified_regions() {
        let mut m = measure();
        m.notified_regions = vec![notified("fir-2", "EHAA", &["<@&1>", "<@&2>"])];
        assert_eq!(event_name_and_interested_parties(&m), "<@&1> <@&2>");
    }

    #[test]
    fn falls_back_to_region_identifier_without_tags() {
        let mut m = measure();
        m.notified_regions = vec![
            notified("fir-2", "EHAA", &[]),
            notified("fir-3", "EBBU", &["<@&3>"]),
        ];
        assert_eq!(event_name_and_interested_parties(&m), "EHAA <@&3>");
    }

    #[test]
    fn deduplicates_tags_across_regions() {
        let mut m = measure();
        m.notified_regions = vec![
            notified("fir-2", "EHAA", &["<@&1>"]),
            notified("fir-3", "EBBU", &["<@&1>", "<@&2>"]),
        ];
        assert_eq!(event_name_and_interested_parties(&m), "<@&1> <@&2>");
    }

    #[test]
    fn event_name_leads_when_present() {
        let mut m = measure();
        m.event = Some(Event {
            id: "e-1".to_string(),
            name: "Fly-in".to_string(),
            date_start: Utc.with_ymd_and_hms(2022, 5, 22, 12, 0, 0).unwrap(),
            date_end: Utc.with_ymd_and_hms(2022, 5, 22, 18, 0, 0).unwrap(),
            flight_information_region_id: "fir-1".to_string(),
        });
        m.notified_regions = vec![notified("fir-2", "EHAA", &["<@&1>"])];
        assert_eq!(
            event_name_and_interested_parties(&m),
            "Fly-in (22/05 - 22/05)\n<@&1>"
        );
    }

    #[test]
    fn deterministic_for_identical_state() {
        let mut m = measure();
        m.notified_regions = vec![notified("fir-2", "EHAA", &["<@&1>"])];
        assert_eq!(
            event_name_and_interested_parties(&m),
            event_name_and_interested_parties(&m)
        );
    }
}
