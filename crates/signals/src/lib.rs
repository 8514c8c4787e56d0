//! Thing and policy events as they travel through Ditto, each wrapped in an
//! [`EventEnvelope`] carrying entity id, revision and [`DittoHeaders`].
//!
//! [`DittoHeaders`]: ditto_headers::DittoHeaders

pub mod envelope;
pub mod error;
pub mod event;
pub mod policies;
pub mod revision;
pub mod things;

pub use envelope::{EventEnvelope, EventEnvelopeBuilder};
pub use error::SignalError;
pub use event::Event;
pub use policies::PolicyEvent;
pub use revision::Revision;
pub use things::ThingEvent;
