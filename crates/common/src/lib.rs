//! Shared value types carried in Ditto headers.
//!
//! Every type here parses from and renders to the textual form used in
//! header values, so the header layer can validate by parsing.

pub mod acks;
pub mod auth;
pub mod duration;
pub mod entity_id;
pub mod entity_tag;
pub mod error;

pub use acks::{AcknowledgementLabel, AcknowledgementRequest};
pub use auth::{AuthorizationContext, AuthorizationSubject};
pub use duration::{DittoDuration, DurationUnit};
pub use entity_id::{EntityId, PolicyId, ThingId};
pub use entity_tag::{EntityTag, EntityTagMatcher, EntityTagMatchers};
pub use error::ParseError;
