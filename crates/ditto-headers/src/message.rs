//! Headers specific to live messages sent to or from a thing.

use crate::definition::HeaderDefinition;
use crate::error::HeaderError;
use crate::options::MessageDirection;
use crate::validators::{EnumValidator, StatusCodeValidator, ValueValidator, default_validator};
use crate::value_type::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageHeaderDefinition {
    Subject,
    Direction,
    ThingId,
    FeatureId,
    StatusCode,
    Timestamp,
}

static MESSAGE_HEADER_DEFINITIONS: [MessageHeaderDefinition; 6] = [
    MessageHeaderDefinition::Subject,
    MessageHeaderDefinition::Direction,
    MessageHeaderDefinition::ThingId,
    MessageHeaderDefinition::FeatureId,
    MessageHeaderDefinition::StatusCode,
    MessageHeaderDefinition::Timestamp,
];

impl MessageHeaderDefinition {
    pub fn all() -> &'static [MessageHeaderDefinition] {
        &MESSAGE_HEADER_DEFINITIONS
    }

    pub fn for_key(key: &str) -> Option<MessageHeaderDefinition> {
        MESSAGE_HEADER_DEFINITIONS
            .iter()
            .copied()
            .find(|definition| definition.key().eq_ignore_ascii_case(key))
    }
}

impl HeaderDefinition for MessageHeaderDefinition {
    fn key(&self) -> &'static str {
        match self {
            MessageHeaderDefinition::Subject => "subject",
            MessageHeaderDefinition::Direction => "direction",
            MessageHeaderDefinition::ThingId => "thing-id",
            MessageHeaderDefinition::FeatureId => "feature-id",
            MessageHeaderDefinition::StatusCode => "status-code",
            MessageHeaderDefinition::Timestamp => "timestamp",
        }
    }

    fn value_type(&self) -> ValueType {
        match self {
            MessageHeaderDefinition::Subject => ValueType::NonEmptyString,
            MessageHeaderDefinition::Direction
            | MessageHeaderDefinition::ThingId
            | MessageHeaderDefinition::FeatureId => ValueType::String,
            MessageHeaderDefinition::StatusCode => ValueType::Integer,
            MessageHeaderDefinition::Timestamp => ValueType::Timestamp,
        }
    }

    fn should_read_from_external(&self) -> bool {
        true
    }

    fn should_write_to_external(&self) -> bool {
        true
    }

    fn validate_value(&self, value: &str) -> Result<(), HeaderError> {
        match self {
            MessageHeaderDefinition::Direction => default_validator()
                .and_then(EnumValidator::case_insensitive(MessageDirection::VALUES))
                .validate(self, value),
            MessageHeaderDefinition::StatusCode => default_validator()
                .and_then(StatusCodeValidator)
                .validate(self, value),
            _ => default_validator().validate(self, value),
        }
    }
}
