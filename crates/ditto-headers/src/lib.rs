//! Typed, validating headers for Ditto signals.
//!
//! [`DittoHeaders`] is a case-insensitive, insertion-ordered header map. Every
//! well-known header has a [`HeaderDefinition`] naming its key, value type and
//! whether it may cross the boundary to external systems. Values are checked
//! by a chain of [`validators`] whenever they are put into the map.

pub mod conditional;
pub mod config;
pub mod definition;
pub mod error;
pub mod headers;
pub mod map;
pub mod message;
pub mod options;
pub mod translator;
pub mod validators;
pub mod value_type;

pub use conditional::{PreconditionError, RequestKind, check_preconditions};
pub use config::HeadersConfig;
pub use definition::{DittoHeaderDefinition, HeaderDefinition};
pub use error::HeaderError;
pub use headers::{DittoHeaders, DittoHeadersBuilder};
pub use map::CaseInsensitiveHeaders;
pub use message::MessageHeaderDefinition;
pub use options::{
    Channel, IfEqual, JsonSchemaVersion, LiveChannelTimeoutStrategy, MessageDirection,
    ResponseType, UnknownValue,
};
pub use translator::HeaderTranslator;
pub use value_type::{JsonType, ValueType};
