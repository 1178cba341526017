pub mod description;
pub mod enums;
pub mod message;
pub mod models;
pub mod policy;
pub mod validation;

pub use description::event_name_and_interested_parties;
pub use enums::{FlowMeasureStatus, FlowMeasureType, RoleKey};
pub use message::{Colour, Embed, EmbedField, NotificationMessage};
pub use models::{
    DiscordTag, Event, FlightInformationRegion, FlowFilter, FlowMeasure, FlowMeasureDraft,
    FlowMeasureUpdate, NotifiedRegion, User,
};
pub use policy::{can_access_panel, can_manage_region, capabilities, visible_regions, Capability};
pub use validation::{field_rules, validate_draft, validate_update, FieldRules, ValidationError};
