//! Enumerations for flow measure types, statuses, and user roles.

use serde::{Deserialize, Serialize};

/// Kind of traffic-management restriction a flow measure imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMeasureType {
    MinimumDepartureInterval,
    AverageDepartureInterval,
    PerHourRate,
    MilesInTrail,
    MaxIndicatedAirspeed,
    IndicatedAirspeedReduction,
    Prohibit,
    MandatoryRoute,
    LevelCap,
}

impl FlowMeasureType {
    /// Label shown in embeds and selection lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MinimumDepartureInterval => "Minimum Departure Interval [MDI]",
            Self::AverageDepartureInterval => "Average Departure Interval [ADI]",
            Self::PerHourRate => "Per Hour Rate",
            Self::MilesInTrail => "Miles In Trail [MIT]",
            Self::MaxIndicatedAirspeed => "Max IAS",
            Self::IndicatedAirspeedReduction => "IAS Reduction",
            Self::Prohibit => "Prohibit",
            Self::MandatoryRoute => "Mandatory Route",
            Self::LevelCap => "Level Cap",
        }
    }

    /// Helper text describing what the measure's value represents.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MinimumDepartureInterval => {
                "Minimum time between departures of flights matching the filters"
            }
            Self::AverageDepartureInterval => {
                "Average time between departures, measured over three departures"
            }
            Self::PerHourRate => "Number of departures allowed per hour",
            Self::MilesInTrail => "Required spacing in nautical miles between flights in trail",
            Self::MaxIndicatedAirspeed => "Maximum indicated airspeed in knots",
            Self::IndicatedAirspeedReduction => "Reduction of indicated airspeed in knots",
            Self::Prohibit => "Flights matching the filters are prohibited",
            Self::MandatoryRoute => "Flights matching the filters must file one of the routes",
            Self::LevelCap => "Maximum flight level for flights matching the filters",
        }
    }

    /// Interval types carry minutes/seconds instead of a value payload.
    pub fn is_interval(&self) -> bool {
        matches!(
            self,
            Self::MinimumDepartureInterval | Self::AverageDepartureInterval
        )
    }

    /// Whether the free-form value payload is required for this type.
    pub fn requires_value(&self) -> bool {
        !self.is_interval() && !matches!(self, Self::MandatoryRoute | Self::Prohibit)
    }
}

/// Lifecycle state of a flow measure.
///
/// Notified -> Active -> (Withdrawn | Expired). Transitions are irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMeasureStatus {
    Notified,
    Active,
    Withdrawn,
    Expired,
}

impl FlowMeasureStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Notified => "Notified",
            Self::Active => "Active",
            Self::Withdrawn => "Withdrawn",
            Self::Expired => "Expired",
        }
    }

    /// Whether a measure in this status may still be withdrawn.
    pub fn is_withdrawable(&self) -> bool {
        matches!(self, Self::Notified | Self::Active)
    }
}

/// Role assigned to a panel user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKey {
    System,
    Nmt,
    FlowManager,
    User,
}

impl RoleKey {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Nmt => "Network Management Team",
            Self::FlowManager => "Flow Manager",
            Self::User => "User",
        }
    }
}
