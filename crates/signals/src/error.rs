//! Errors raised while reading signals from JSON.

use common::ParseError;
use serde_json::{Value, json};
use thiserror::Error;

/// Errors raised while reading events from JSON.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("The JSON field '{0}' is missing.")]
    MissingField(&'static str),

    #[error("The JSON field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("The entity ID '{id}' is not valid: {source}")]
    InvalidEntityId {
        id: String,
        #[source]
        source: ParseError,
    },

    #[error("The event type '{0}' is unknown.")]
    UnknownType(String),

    #[error("The JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SignalError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SignalError::MissingField(_) => "json.field.missing",
            SignalError::InvalidField { .. } | SignalError::Json(_) => "json.invalid",
            SignalError::InvalidEntityId { .. } => "entity.id.invalid",
            SignalError::UnknownType(_) => "events.type.unknown",
        }
    }

    /// All signal errors are client errors.
    pub fn status(&self) -> u16 {
        400
    }

    pub fn description(&self) -> String {
        match self {
            SignalError::MissingField(_) | SignalError::InvalidField { .. } => {
                "Check the JSON of the event and try again.".to_string()
            }
            SignalError::InvalidEntityId { .. } => {
                "The ID must be a namespace followed by ':' and a name.".to_string()
            }
            SignalError::UnknownType(_) => "Use a known event type.".to_string(),
            SignalError::Json(_) => "Provide the event as valid JSON object.".to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status(),
            "error": self.error_code(),
            "message": self.to_string(),
            "description": self.description(),
        })
    }
}
