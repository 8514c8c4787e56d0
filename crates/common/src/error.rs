//! Error raised by the value types of this crate.

use thiserror::Error;

/// Errors raised when parsing a value type from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Authorization subject must not be empty")]
    EmptyAuthorizationSubject,

    #[error("Invalid authorization context: {0}")]
    InvalidAuthorizationContext(String),

    #[error("Invalid acknowledgement label: <{0}>")]
    InvalidAcknowledgementLabel(String),

    #[error("Invalid entity tag: <{0}>")]
    InvalidEntityTag(String),

    #[error("Invalid entity tag matchers: <{0}>")]
    InvalidEntityTagMatchers(String),

    #[error("Invalid duration: <{0}>")]
    InvalidDuration(String),

    #[error("Invalid entity id <{id}>: {reason}")]
    InvalidEntityId { id: String, reason: &'static str },
}
