//! The event trait implemented by thing and policy events.

use std::fmt::Debug;
use std::str::FromStr;

use common::ParseError;
use serde::{Serialize, de::DeserializeOwned};

/// An event that happened to a Ditto entity.
///
/// The JSON form is an object with a `type` discriminator and the event's
/// own fields; the entity id and revision are added by
/// [`EventEnvelope`](crate::EventEnvelope).
pub trait Event: Serialize + DeserializeOwned + Debug + Send + Sync + Clone {
    /// The id type of the entity the event belongs to.
    type EntityId: FromStr<Err = ParseError>
        + std::fmt::Display
        + Debug
        + Clone
        + PartialEq
        + Send
        + Sync;

    /// JSON field holding the entity id, e.g. `thingId`.
    const ENTITY_ID_FIELD: &'static str;

    /// All `type` values of this event family.
    const TYPES: &'static [&'static str];

    /// Returns the event type, e.g. `things.events:thingCreated`.
    fn event_type(&self) -> &'static str;
}
