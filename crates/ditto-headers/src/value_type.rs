//! Value and serialization types of header definitions.

use serde_json::Value;

/// The type a header value has to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    NonEmptyString,
    Integer,
    Long,
    Boolean,
    JsonArray,
    JsonObject,
    EntityTag,
    EntityTagMatchers,
    Duration,
    Timestamp,
}

impl ValueType {
    /// The JSON type a value of this type is rendered as.
    pub fn serialization_type(self) -> JsonType {
        match self {
            ValueType::Integer | ValueType::Long => JsonType::Number,
            ValueType::Boolean => JsonType::Boolean,
            ValueType::JsonArray => JsonType::Array,
            ValueType::JsonObject => JsonType::Object,
            ValueType::String
            | ValueType::NonEmptyString
            | ValueType::EntityTag
            | ValueType::EntityTagMatchers
            | ValueType::Duration
            | ValueType::Timestamp => JsonType::String,
        }
    }

    /// Human readable name used in validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::NonEmptyString => "non-empty String",
            ValueType::Integer => "int",
            ValueType::Long => "long",
            ValueType::Boolean => "boolean",
            ValueType::JsonArray => "JSON array",
            ValueType::JsonObject => "JSON object",
            ValueType::EntityTag => "entity-tag",
            ValueType::EntityTagMatchers => "list of entity-tags",
            ValueType::Duration => "duration",
            ValueType::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// JSON type of a header value in the JSON representation of headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl JsonType {
    /// Renders a raw header value as this JSON type.
    ///
    /// Values that do not parse as the type are rendered as JSON strings.
    pub fn render(self, raw: &str) -> Value {
        let fallback = || Value::String(raw.to_string());
        match self {
            JsonType::String => fallback(),
            JsonType::Number => raw.parse::<i64>().map(Value::from).unwrap_or_else(|_| fallback()),
            JsonType::Boolean => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => fallback(),
            },
            JsonType::Array => parse_json_array(raw)
                .map(Value::Array)
                .unwrap_or_else(fallback),
            JsonType::Object => serde_json::from_str::<Value>(raw)
                .ok()
                .filter(Value::is_object)
                .unwrap_or_else(fallback),
        }
    }
}

/// Parses an array header value.
///
/// Accepts JSON array text as well as a comma-separated list of strings.
/// A blank value is the empty array.
pub(crate) fn parse_json_array(raw: &str) -> Option<Vec<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).ok();
    }
    Some(
        trimmed
            .split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
    )
}

/// Parses an array header value whose elements all have to be strings.
pub(crate) fn parse_string_array(raw: &str) -> Option<Vec<String>> {
    parse_json_array(raw)?
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}
