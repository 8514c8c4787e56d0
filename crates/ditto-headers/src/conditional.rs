//! Evaluation of `if-match` and `if-none-match` against an entity's tag.

use common::EntityTag;
use serde_json::{Value, json};
use thiserror::Error;

use crate::headers::DittoHeaders;

/// Whether a request only reads or also modifies the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("The comparison of precondition header '{header}' for the requested resource evaluated to false. Header value: '{value}', actual entity-tag: '{actual}'.")]
    Failed {
        header: &'static str,
        value: String,
        actual: String,
    },

    #[error("The comparison of precondition header 'if-none-match' for the requested resource evaluated to false. Expected: '{value}' not to match actual: '{actual}'.")]
    NotModified { value: String, actual: String },
}

impl PreconditionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreconditionError::Failed { .. } => "precondition.failed",
            PreconditionError::NotModified { .. } => "precondition.notmodified",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            PreconditionError::Failed { .. } => 412,
            PreconditionError::NotModified { .. } => 304,
        }
    }

    pub fn description(&self) -> String {
        match self {
            PreconditionError::Failed { .. } => {
                "The comparison of the provided precondition header with the current ETag value of the requested resource evaluated to false. Check the value of your conditional header value.".to_string()
            }
            PreconditionError::NotModified { .. } => {
                "The requested resource was not modified.".to_string()
            }
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

/// Checks the conditional headers against the current entity tag.
///
/// `current` is `None` when the entity does not exist. `*` matches any
/// existing entity and nothing else.
pub fn check_preconditions(
    headers: &DittoHeaders,
    current: Option<&EntityTag>,
    kind: RequestKind,
) -> Result<(), PreconditionError> {
    let actual = || current.map(ToString::to_string).unwrap_or_default();

    if let Some(if_match) = headers.if_match() {
        let matches = current.is_some_and(|tag| if_match.any_strong_match(tag));
        if !matches {
            return Err(PreconditionError::Failed {
                header: "if-match",
                value: if_match.to_string(),
                actual: actual(),
            });
        }
    }

    if let Some(if_none_match) = headers.if_none_match() {
        let matches = current.is_some_and(|tag| if_none_match.any_weak_match(tag));
        if matches {
            let value = if_none_match.to_string();
            return Err(match kind {
                RequestKind::Read => PreconditionError::NotModified {
                    value,
                    actual: actual(),
                },
                RequestKind::Write => PreconditionError::Failed {
                    header: "if-none-match",
                    value,
                    actual: actual(),
                },
            });
        }
    }

    Ok(())
}
