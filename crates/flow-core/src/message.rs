//! Notification message formatting.
//!
//! One constructor per status transition produces the structured payload
//! handed to the chat client. Formatting is a pure function of measure
//! state, so delivery may be retried without recomputing anything.

use serde::{Deserialize, Serialize};

use crate::description::event_name_and_interested_parties;
use crate::enums::{FlowMeasureStatus, FlowMeasureType};
use crate::models::{FlowFilter, FlowMeasure};

/// Invisible field used to pad the embed's 3-column field grid.
pub const ZERO_WIDTH_SPACE: &str = "\u{200b}";

/// Embed colour palette, keyed by transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colour {
    Notified,
    Activated,
    Withdrawn,
    Expired,
}

impl Colour {
    pub fn code(&self) -> u32 {
        match self {
            Self::Notified => 0xF1C40F,
            Self::Activated => 0x2ECC71,
            Self::Withdrawn => 0xE74C3C,
            Self::Expired => 0x95A5A6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }

    fn spacer() -> Self {
        Self::new(ZERO_WIDTH_SPACE, ZERO_WIDTH_SPACE, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub description: String,
    pub fields: Vec<EmbedField>,
}

/// A fully-formed chat notification: no plain-text body, exactly one embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub content: String,
    pub embeds: Vec<Embed>,
}

impl NotificationMessage {
    pub fn notified(measure: &FlowMeasure) -> Self {
        build(measure, FlowMeasureStatus::Notified, Colour::Notified)
    }

    pub fn activated(measure: &FlowMeasure) -> Self {
        build(measure, FlowMeasureStatus::Active, Colour::Activated)
    }

    pub fn withdrawn(measure: &FlowMeasure) -> Self {
        build(measure, FlowMeasureStatus::Withdrawn, Colour::Withdrawn)
    }

    pub fn expired(measure: &FlowMeasure) -> Self {
        build(measure, FlowMeasureStatus::Expired, Colour::Expired)
    }

    /// Build the message for an arbitrary status. Used when the transition
    /// is chosen at runtime.
    pub fn for_status(measure: &FlowMeasure, status: FlowMeasureStatus) -> Self {
        match status {
            FlowMeasureStatus::Notified => Self::notified(measure),
            FlowMeasureStatus::Active => Self::activated(measure),
            FlowMeasureStatus::Withdrawn => Self::withdrawn(measure),
            FlowMeasureStatus::Expired => Self::expired(measure),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn embeds(&self) -> &[Embed] {
        &self.embeds
    }
}

fn build(measure: &FlowMeasure, status: FlowMeasureStatus, colour: Colour) -> NotificationMessage {
    NotificationMessage {
        content: String::new(),
        embeds: vec![Embed {
            title: format!("{} - {}", measure.identifier, status.display_name()),
            color: colour.code(),
            description: event_name_and_interested_parties(measure),
            fields: build_fields(measure),
        }],
    }
}

fn build_fields(measure: &FlowMeasure) -> Vec<EmbedField> {
    let mut fields = Vec::new();

    if let Some(value) = headline_value(measure) {
        fields.push(EmbedField::new(
            measure.measure_type.display_name(),
            value,
            true,
        ));
    }

    fields.push(EmbedField::new(
        "Start Time",
        format!("{}Z", measure.start_time.format("%d/%m %H%M")),
        true,
    ));
    fields.push(EmbedField::new("End Time", end_time_value(measure), true));

    // Filter fields keep insertion order. Once the first non-inline field
    // appears the inline grid is padded out to a full 3-column row.
    let mut padded = false;
    for filter in &measure.additional_filters {
        let field = filter_field(filter);
        if !field.inline && !padded {
            pad_grid(&mut fields);
            padded = true;
        }
        fields.push(field);
    }
    if !padded {
        pad_grid(&mut fields);
    }

    fields.push(EmbedField::new("Reason", measure.reason.clone(), false));
    fields
}

fn headline_value(measure: &FlowMeasure) -> Option<String> {
    if measure.measure_type.is_interval() {
        return Some(interval_value(measure.minutes, measure.seconds));
    }
    match measure.measure_type {
        FlowMeasureType::Prohibit => None,
        FlowMeasureType::MandatoryRoute => Some(measure.mandatory_route.join("\n")),
        _ => Some(measure.value.clone().unwrap_or_default()),
    }
}

fn interval_value(minutes: u32, seconds: u32) -> String {
    if seconds == 0 {
        format!("{} Minutes", minutes)
    } else {
        format!("{} Minutes {} Seconds", minutes, seconds)
    }
}

/// End time drops the date segment when it falls on the same UTC day as
/// the start time.
fn end_time_value(measure: &FlowMeasure) -> String {
    let same_day = measure.start_time.date_naive() == measure.end_time.date_naive();
    if same_day {
        format!("{}Z", measure.end_time.format("%H%M"))
    } else {
        format!("{}Z", measure.end_time.format("%d/%m %H%M"))
    }
}

fn filter_field(filter: &FlowFilter) -> EmbedField {
    match filter {
        FlowFilter::DepartureAirports(patterns) => {
            EmbedField::new("Departure Airports", patterns.join(", "), true)
        }
        FlowFilter::ArrivalAirports(patterns) => {
            EmbedField::new("Arrival Airports", patterns.join(", "), true)
        }
        FlowFilter::LevelBelow(level) => {
            EmbedField::new("Level at or Below", level.to_string(), false)
        }
    }
}

fn pad_grid(fields: &mut Vec<EmbedField>) {
    let inline = fields.iter().filter(|f| f.inline).count();
    let remainder = inline % 3;
    if remainder != 0 {
        for _ in remainder..3 {
            fields.push(EmbedField::spacer());
        }
    }
}
