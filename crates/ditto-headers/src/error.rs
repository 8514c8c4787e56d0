//! Header validation and limit errors.

use serde_json::{Value, json};
use thiserror::Error;

use crate::definition::HeaderDefinition;

/// Errors raised while building, validating or limiting headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// A header value failed validation against its definition.
    #[error("The value '{value}' of the header '{key}' is not a valid {expected}.")]
    Invalid {
        key: String,
        value: String,
        expected: String,
        description: Option<String>,
    },

    /// The summed key and value sizes exceed the allowed number of bytes.
    #[error("The headers are too large.")]
    TooLarge { size: usize, max: usize },

    /// The authorization context holds more subjects than allowed.
    #[error("The headers are too large.")]
    TooManyAuthSubjects { count: usize, max: usize },

    /// Headers were given as JSON that is not an object.
    #[error("The headers JSON is not an object.")]
    NotAnObject,
}

impl HeaderError {
    /// Invalid value for a definition, expecting its value type.
    pub fn invalid(definition: &dyn HeaderDefinition, value: &str) -> Self {
        Self::invalid_as(definition, value, definition.value_type().display_name())
    }

    /// Invalid value for a definition with a custom expectation.
    pub fn invalid_as(
        definition: &dyn HeaderDefinition,
        value: &str,
        expected: impl Into<String>,
    ) -> Self {
        HeaderError::Invalid {
            key: definition.key().to_string(),
            value: value.to_string(),
            expected: expected.into(),
            description: None,
        }
    }

    /// Replaces the description of an invalid header error.
    pub fn with_description(self, text: impl Into<String>) -> Self {
        match self {
            HeaderError::Invalid {
                key,
                value,
                expected,
                ..
            } => HeaderError::Invalid {
                key,
                value,
                expected,
                description: Some(text.into()),
            },
            other => other,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            HeaderError::Invalid { .. } => "header.invalid",
            HeaderError::TooLarge { .. } | HeaderError::TooManyAuthSubjects { .. } => {
                "headers.too.large"
            }
            HeaderError::NotAnObject => "json.invalid",
        }
    }

    /// HTTP status code the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            HeaderError::Invalid { .. } | HeaderError::NotAnObject => 400,
            HeaderError::TooLarge { .. } | HeaderError::TooManyAuthSubjects { .. } => 431,
        }
    }

    pub fn description(&self) -> String {
        match self {
            HeaderError::Invalid {
                key, description, ..
            } => description.clone().unwrap_or_else(|| {
                format!("Verify that the value of the header '{key}' is correct and try again.")
            }),
            HeaderError::TooLarge { max, .. } => {
                format!("The number of bytes exceeded the maximum allowed value <{max}>!")
            }
            HeaderError::TooManyAuthSubjects { count, max } => format!(
                "The number of authorization subjects <{count}> exceeded the maximum allowed value <{max}>."
            ),
            HeaderError::NotAnObject => "Provide the headers as a JSON object.".to_string(),
        }
    }

    /// Renders the error in the structured form returned to clients.
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status(),
            "error": self.error_code(),
            "message": self.to_string(),
            "description": self.description(),
        })
    }
}
