//! Thing events.

use common::ThingId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::Event;

/// Events that can occur on a thing.
///
/// Payloads are opaque JSON; the thing model itself is not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThingEvent {
    /// The thing was created.
    #[serde(rename = "things.events:thingCreated")]
    ThingCreated { thing: Value },

    /// The thing was replaced as a whole.
    #[serde(rename = "things.events:thingModified")]
    ThingModified { thing: Value },

    /// A JSON merge patch was applied at `path`.
    #[serde(rename = "things.events:thingMerged")]
    ThingMerged { path: String, value: Value },

    #[serde(rename = "things.events:thingDeleted")]
    ThingDeleted,

    /// An attribute at the JSON pointer `attribute` was created or replaced.
    #[serde(rename = "things.events:attributeModified")]
    AttributeModified { attribute: String, value: Value },

    #[serde(rename = "things.events:attributeDeleted")]
    AttributeDeleted { attribute: String },
}

impl Event for ThingEvent {
    type EntityId = ThingId;

    const ENTITY_ID_FIELD: &'static str = "thingId";

    const TYPES: &'static [&'static str] = &[
        "things.events:thingCreated",
        "things.events:thingModified",
        "things.events:thingMerged",
        "things.events:thingDeleted",
        "things.events:attributeModified",
        "things.events:attributeDeleted",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            ThingEvent::ThingCreated { .. } => "things.events:thingCreated",
            ThingEvent::ThingModified { .. } => "things.events:thingModified",
            ThingEvent::ThingMerged { .. } => "things.events:thingMerged",
            ThingEvent::ThingDeleted => "things.events:thingDeleted",
            ThingEvent::AttributeModified { .. } => "things.events:attributeModified",
            ThingEvent::AttributeDeleted { .. } => "things.events:attributeDeleted",
        }
    }
}
