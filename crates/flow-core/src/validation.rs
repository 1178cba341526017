//! Write-time validation for flow measures.
//!
//! The same rules gate every mutation path (admin UI or direct API caller),
//! and the current time is always injected so the rules stay testable.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::enums::FlowMeasureType;
use crate::models::{Event, FlowMeasure, FlowMeasureDraft, FlowMeasureUpdate};

/// Maximum accepted length for the reason text.
pub const MAX_REASON_LENGTH: usize = 65_535;

/// Measures may not be scheduled more than this far ahead.
pub const MAX_DAYS_AHEAD: i64 = 10;

/// A field-scoped validation failure. Surfaced to the caller before any
/// persistence occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Field requirement and visibility rules for a measure type, consumed
/// identically by validation and any form layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub required: &'static [&'static str],
    pub visible: &'static [&'static str],
    pub hidden: &'static [&'static str],
}

/// Resolve which type-specific fields are required, visible, and hidden
/// for the given measure type.
pub fn field_rules(measure_type: FlowMeasureType) -> FieldRules {
    if measure_type.is_interval() {
        return FieldRules {
            required: &["minutes", "seconds"],
            visible: &["minutes", "seconds"],
            hidden: &["value", "mandatory_route"],
        };
    }

    match measure_type {
        FlowMeasureType::MandatoryRoute => FieldRules {
            required: &["mandatory_route"],
            visible: &["mandatory_route"],
            hidden: &["value", "minutes", "seconds"],
        },
        FlowMeasureType::Prohibit => FieldRules {
            required: &[],
            visible: &[],
            hidden: &["value", "minutes", "seconds", "mandatory_route"],
        },
        _ => FieldRules {
            required: &["value"],
            visible: &["value"],
            hidden: &["minutes", "seconds", "mandatory_route"],
        },
    }
}

/// Validate a creation draft. `event` must be the resolved event when
/// `draft.event_id` is set.
pub fn validate_draft(
    draft: &FlowMeasureDraft,
    event: Option<&Event>,
    now: DateTime<Utc>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_reason(&draft.reason, &mut errors);
    validate_type_fields(
        draft.measure_type,
        draft.value.as_deref(),
        draft.seconds,
        &draft.mandatory_route,
        &mut errors,
    );

    if draft.end_time <= draft.start_time {
        errors.push(ValidationError::new(
            "end_time",
            "End time must be after start time",
        ));
    }
    if draft.start_time < now {
        errors.push(ValidationError::new(
            "start_time",
            "Start time must not be in the past",
        ));
    }
    let horizon = now + Duration::days(MAX_DAYS_AHEAD);
    if draft.start_time > horizon {
        errors.push(ValidationError::new(
            "start_time",
            format!("Start time must be within {} days", MAX_DAYS_AHEAD),
        ));
    }
    if draft.end_time > horizon {
        errors.push(ValidationError::new(
            "end_time",
            format!("End time must be within {} days", MAX_DAYS_AHEAD),
        ));
    }

    if let Some(event) = event {
        if event.flight_information_region_id != draft.flight_information_region_id {
            errors.push(ValidationError::new(
                "event_id",
                "Event belongs to a different flight information region",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an update against the stored measure. Start time is immutable,
/// so only the end of the window is re-checked.
pub fn validate_update(
    measure: &FlowMeasure,
    update: &FlowMeasureUpdate,
    now: DateTime<Utc>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_reason(&update.reason, &mut errors);
    validate_type_fields(
        measure.measure_type,
        update.value.as_deref(),
        update.seconds,
        &update.mandatory_route,
        &mut errors,
    );

    if update.end_time <= measure.start_time {
        errors.push(ValidationError::new(
            "end_time",
            "End time must be after start time",
        ));
    }
    if update.end_time > now + Duration::days(MAX_DAYS_AHEAD) {
        errors.push(ValidationError::new(
            "end_time",
            format!("End time must be within {} days", MAX_DAYS_AHEAD),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_reason(reason: &str, errors: &mut Vec<ValidationError>) {
    if reason.trim().is_empty() {
        errors.push(ValidationError::new("reason", "Reason is required"));
    } else if reason.len() > MAX_REASON_LENGTH {
        errors.push(ValidationError::new(
            "reason",
            format!("Reason must not exceed {} characters", MAX_REASON_LENGTH),
        ));
    }
}

fn validate_type_fields(
    measure_type: FlowMeasureType,
    value: Option<&str>,
    seconds: u32,
    mandatory_route: &[String],
    errors: &mut Vec<ValidationError>,
) {
    if measure_type.requires_value() && value.map_or(true, |v| v.trim().is_empty()) {
        errors.push(ValidationError::new(
            "value",
            format!(
                "Value is required for {} measures",
                measure_type.display_name()
            ),
        ));
    }
    if matches!(
        measure_type,
        FlowMeasureType::MandatoryRoute | FlowMeasureType::Prohibit
    ) && value.is_some()
    {
        errors.push(ValidationError::new(
            "value",
            format!(
                "Value is not used for {} measures",
                measure_type.display_name()
            ),
        ));
    }

    if measure_type.is_interval() && seconds > 59 {
        errors.push(ValidationError::new(
            "seconds",
            "Seconds must be between 0 and 59",
        ));
    }

    if measure_type == FlowMeasureType::MandatoryRoute {
        if mandatory_route.is_empty() || mandatory_route.iter().all(|r| r.trim().is_empty()) {
            errors.push(ValidationError::new(
                "mandatory_route",
                "At least one route is required",
            ));
        }
    } else if !mandatory_route.is_empty() {
        errors.push(ValidationError::new(
            "mandatory_route",
            "Routes are only allowed for Mandatory Route measures",
        ));
    }
}
