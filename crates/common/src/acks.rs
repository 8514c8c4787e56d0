//! Acknowledgement labels and requests.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

const MIN_LABEL_LEN: usize = 3;
const MAX_LABEL_LEN: usize = 165;
const CONNECTION_ID_PLACEHOLDER: &str = "connection:id";

/// Label identifying an acknowledgement, e.g. `twin-persisted`.
///
/// Labels consist of 3 to 165 characters out of `[A-Za-z0-9-_:]`. A label
/// declared by a connection may start with the `{{connection:id}}:`
/// placeholder which is resolved once the connection is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AcknowledgementLabel(String);

impl AcknowledgementLabel {
    pub const TWIN_PERSISTED: &'static str = "twin-persisted";
    pub const LIVE_RESPONSE: &'static str = "live-response";
    pub const SEARCH_PERSISTED: &'static str = "search-persisted";

    /// Parses a label, accepting the connection id placeholder prefix.
    pub fn new(label: impl Into<String>) -> Result<Self, ParseError> {
        let label = label.into();
        let rest = match strip_placeholder(&label) {
            Some(rest) => rest,
            None => label.as_str(),
        };
        if !is_valid_label_body(rest) {
            return Err(ParseError::InvalidAcknowledgementLabel(label));
        }
        Ok(Self(label))
    }

    pub fn twin_persisted() -> Self {
        Self(Self::TWIN_PERSISTED.to_string())
    }

    pub fn live_response() -> Self {
        Self(Self::LIVE_RESPONSE.to_string())
    }

    pub fn search_persisted() -> Self {
        Self(Self::SEARCH_PERSISTED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label still carries the `{{connection:id}}` placeholder.
    pub fn is_placeholder(&self) -> bool {
        strip_placeholder(&self.0).is_some()
    }

    /// Whether the label is one of the labels issued by the platform itself.
    pub fn is_built_in(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::TWIN_PERSISTED | Self::LIVE_RESPONSE | Self::SEARCH_PERSISTED
        )
    }
}

/// Returns the label body after a `{{ connection:id }}:` prefix.
fn strip_placeholder(label: &str) -> Option<&str> {
    let inner_and_rest = label.strip_prefix("{{")?;
    let (inner, rest) = inner_and_rest.split_once("}}")?;
    if inner.trim() != CONNECTION_ID_PLACEHOLDER {
        return None;
    }
    rest.strip_prefix(':')
}

fn is_valid_label_body(body: &str) -> bool {
    (MIN_LABEL_LEN..=MAX_LABEL_LEN).contains(&body.len())
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

impl std::fmt::Display for AcknowledgementLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AcknowledgementLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for AcknowledgementLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AcknowledgementLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A request for an acknowledgement with a given label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcknowledgementRequest {
    label: AcknowledgementLabel,
}

impl AcknowledgementRequest {
    pub fn new(label: AcknowledgementLabel) -> Self {
        Self { label }
    }

    pub fn label(&self) -> &AcknowledgementLabel {
        &self.label
    }
}

impl From<AcknowledgementLabel> for AcknowledgementRequest {
    fn from(label: AcknowledgementLabel) -> Self {
        Self::new(label)
    }
}

impl std::fmt::Display for AcknowledgementRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl FromStr for AcknowledgementRequest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AcknowledgementLabel::new(s.trim()).map(Self::new)
    }
}

impl Serialize for AcknowledgementRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.label.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AcknowledgementRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        AcknowledgementLabel::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_built_in_and_custom_labels() {
        for label in ["twin-persisted", "live-response", "my:custom_ack-1", "abc"] {
            assert!(AcknowledgementLabel::new(label).is_ok(), "{label}");
        }
        assert!(AcknowledgementLabel::twin_persisted().is_built_in());
        assert!(!AcknowledgementLabel::new("custom").unwrap().is_built_in());
    }

    #[test]
    fn rejects_short_long_and_illegal_labels() {
        assert!(AcknowledgementLabel::new("ab").is_err());
        assert!(AcknowledgementLabel::new("a".repeat(166)).is_err());
        assert!(AcknowledgementLabel::new("a".repeat(165)).is_ok());
        assert!(AcknowledgementLabel::new("with space").is_err());
        assert!(AcknowledgementLabel::new("slash/label").is_err());
    }

    #[test]
    fn accepts_connection_id_placeholder() {
        let label = AcknowledgementLabel::new("{{connection:id}}:my-ack").unwrap();
        assert!(label.is_placeholder());

        let spaced = AcknowledgementLabel::new("{{ connection:id }}:my-ack").unwrap();
        assert!(spaced.is_placeholder());

        assert!(AcknowledgementLabel::new("{{thing:id}}:my-ack").is_err());
        assert!(AcknowledgementLabel::new("{{connection:id}}my-ack").is_err());
    }

    #[test]
    fn request_parses_trimmed_label() {
        let request: AcknowledgementRequest = " twin-persisted ".parse().unwrap();
        assert_eq!(request.label().as_str(), "twin-persisted");
        assert_eq!(request.to_string(), "twin-persisted");
    }

    #[test]
    fn request_serializes_as_label_string() {
        let request = AcknowledgementRequest::from(AcknowledgementLabel::live_response());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!("live-response"));

        let parsed: Result<AcknowledgementRequest, _> = serde_json::from_value(serde_json::json!("x"));
        assert!(parsed.is_err());
    }
}
