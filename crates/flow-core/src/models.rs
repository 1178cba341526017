//! Domain entities for the flow measure system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{FlowMeasureStatus, FlowMeasureType, RoleKey};

/// An airspace administrative area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightInformationRegion {
    pub id: String,
    /// Short code, e.g. "EGTT".
    pub identifier: String,
    pub name: String,
}

impl FlightInformationRegion {
    /// Combined display label, e.g. "EGTT - London".
    pub fn identifier_name(&self) -> String {
        format!("{} - {}", self.identifier, self.name)
    }
}

/// A Discord mention token owned by a region, pinged when the region is
/// notified of a measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordTag {
    pub id: String,
    pub flight_information_region_id: String,
    pub tag: String,
}

/// A scheduled event a measure may be tied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub flight_information_region_id: String,
}

impl Event {
    /// Display label combining the event name with its date span.
    pub fn name_date(&self) -> String {
        format!(
            "{} ({} - {})",
            self.name,
            self.date_start.format("%d/%m"),
            self.date_end.format("%d/%m")
        )
    }
}

/// A panel user with a role and the regions they may manage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: RoleKey,
    pub flight_information_region_ids: Vec<String>,
}

/// A filter narrowing which flights a measure applies to.
///
/// Wire form is `{"type": ..., "value": ...}`, e.g.
/// `{"type": "level_below", "value": 220}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FlowFilter {
    /// Departure aerodrome patterns, wildcards literal (e.g. "EG**").
    DepartureAirports(Vec<String>),
    /// Arrival aerodrome patterns.
    ArrivalAirports(Vec<String>),
    /// Applies to flights at or below this flight level.
    LevelBelow(u32),
}

/// A notified region together with its Discord mention tags, resolved for
/// message formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifiedRegion {
    pub region: FlightInformationRegion,
    pub discord_tags: Vec<DiscordTag>,
}

/// The flow measure aggregate, with related state resolved so that
/// notification formatting is a pure read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMeasure {
    pub id: String,
    /// Unique display code assigned on creation, e.g. "EGTT01".
    pub identifier: String,
    #[serde(rename = "type")]
    pub measure_type: FlowMeasureType,
    pub status: FlowMeasureStatus,
    pub reason: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Free-form payload, shape depends on the type (e.g. a level for
    /// LevelCap). Not used for interval, mandatory route, or prohibit types.
    pub value: Option<String>,
    /// Interval minutes, meaningful for MDI/ADI only.
    pub minutes: u32,
    /// Interval seconds in [0, 59], meaningful for MDI/ADI only.
    pub seconds: u32,
    /// Ordered route strings, present iff the type is MandatoryRoute.
    pub mandatory_route: Vec<String>,
    pub additional_filters: Vec<FlowFilter>,
    /// Owning region.
    pub flight_information_region_id: String,
    pub event: Option<Event>,
    /// Creating user.
    pub user_id: String,
    /// Regions notified of the measure (FAO), with tags resolved.
    pub notified_regions: Vec<NotifiedRegion>,
}

/// Input for creating a flow measure. The identifier and status are
/// assigned by the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowMeasureDraft {
    #[serde(rename = "type")]
    pub measure_type: FlowMeasureType,
    pub reason: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
    #[serde(default)]
    pub mandatory_route: Vec<String>,
    #[serde(default)]
    pub additional_filters: Vec<FlowFilter>,
    pub flight_information_region_id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub notified_flight_information_region_ids: Vec<String>,
}

/// Editable fields after creation. Region, event, type, and start time are
/// immutable once a measure exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowMeasureUpdate {
    pub reason: String,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
    #[serde(default)]
    pub mandatory_route: Vec<String>,
    #[serde(default)]
    pub additional_filters: Vec<FlowFilter>,
    /// Full replacement for the notified region set (set-sync semantics).
    #[serde(default)]
    pub notified_flight_information_region_ids: Vec<String>,
}
