//! Header value validators.
//!
//! Each validator declares the value types it is responsible for. Calling
//! [`ValueValidator::validate`] on a definition of another type passes
//! silently, which lets validators be chained with
//! [`ValueValidator::and_then`]: every link checks the values it knows
//! about and hands the rest down the chain.

use common::{
    AcknowledgementLabel, AcknowledgementRequest, AuthorizationContext, DittoDuration, EntityTag,
    EntityTagMatchers,
};
use serde_json::{Map, Value};

use crate::definition::HeaderDefinition;
use crate::error::HeaderError;
use crate::options::JsonSchemaVersion;
use crate::value_type::{ValueType, parse_json_array, parse_string_array};

pub trait ValueValidator: Send + Sync {
    /// Whether this validator checks values of the given type.
    fn can_validate(&self, value_type: ValueType) -> bool;

    /// Checks `value` unconditionally.
    fn validate_value(&self, definition: &dyn HeaderDefinition, value: &str)
    -> Result<(), HeaderError>;

    /// Checks `value` if this validator is responsible for the definition's
    /// value type.
    fn validate(&self, definition: &dyn HeaderDefinition, value: &str) -> Result<(), HeaderError> {
        if self.can_validate(definition.value_type()) {
            self.validate_value(definition, value)
        } else {
            Ok(())
        }
    }

    /// Runs `next` after this validator.
    fn and_then<V: ValueValidator>(self, next: V) -> Chain<Self, V>
    where
        Self: Sized,
    {
        Chain { first: self, next }
    }
}

/// Two validators run one after the other.
#[derive(Debug, Clone, Copy)]
pub struct Chain<A, B> {
    first: A,
    next: B,
}

impl<A: ValueValidator, B: ValueValidator> ValueValidator for Chain<A, B> {
    fn can_validate(&self, value_type: ValueType) -> bool {
        self.first.can_validate(value_type) || self.next.can_validate(value_type)
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        self.first.validate(definition, value)?;
        self.next.validate(definition, value)
    }

    fn validate(&self, definition: &dyn HeaderDefinition, value: &str) -> Result<(), HeaderError> {
        self.validate_value(definition, value)
    }
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpValidator;

impl ValueValidator for NoOpValidator {
    fn can_validate(&self, _value_type: ValueType) -> bool {
        true
    }

    fn validate_value(&self, _: &dyn HeaderDefinition, _: &str) -> Result<(), HeaderError> {
        Ok(())
    }
}

macro_rules! parsing_validator {
    ($(#[$doc:meta])* $name:ident, $value_type:ident, |$value:ident| $check:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ValueValidator for $name {
            fn can_validate(&self, value_type: ValueType) -> bool {
                value_type == ValueType::$value_type
            }

            fn validate_value(
                &self,
                definition: &dyn HeaderDefinition,
                $value: &str,
            ) -> Result<(), HeaderError> {
                if $check {
                    Ok(())
                } else {
                    Err(HeaderError::invalid(definition, $value))
                }
            }
        }
    };
}

parsing_validator!(IntValidator, Integer, |value| value.parse::<i32>().is_ok());
parsing_validator!(LongValidator, Long, |value| value.parse::<i64>().is_ok());
parsing_validator!(
    /// Only the literals `true` and `false`.
    BooleanValidator,
    Boolean,
    |value| value == "true" || value == "false"
);
parsing_validator!(NonEmptyValidator, NonEmptyString, |value| !value
    .trim()
    .is_empty());
parsing_validator!(JsonArrayValidator, JsonArray, |value| parse_json_array(value)
    .is_some());
parsing_validator!(JsonObjectValidator, JsonObject, |value| {
    serde_json::from_str::<Map<String, Value>>(value).is_ok()
});
parsing_validator!(EntityTagValidator, EntityTag, |value| value
    .parse::<EntityTag>()
    .is_ok());
parsing_validator!(EntityTagMatchersValidator, EntityTagMatchers, |value| value
    .parse::<EntityTagMatchers>()
    .is_ok());
parsing_validator!(
    /// Non-negative durations such as `500ms`, `10s` or `1m`.
    DurationValidator,
    Duration,
    |value| value.parse::<DittoDuration>().is_ok()
);
parsing_validator!(
    /// RFC 3339 timestamps.
    TimestampValidator,
    Timestamp,
    |value| chrono::DateTime::parse_from_rfc3339(value).is_ok()
);

/// The chain of all type validators.
pub fn default_validator() -> impl ValueValidator {
    IntValidator
        .and_then(LongValidator)
        .and_then(BooleanValidator)
        .and_then(NonEmptyValidator)
        .and_then(JsonArrayValidator)
        .and_then(JsonObjectValidator)
        .and_then(EntityTagValidator)
        .and_then(EntityTagMatchersValidator)
        .and_then(DurationValidator)
        .and_then(TimestampValidator)
}

/// One of a fixed set of string values.
#[derive(Debug, Clone, Copy)]
pub struct EnumValidator {
    values: &'static [&'static str],
    case_sensitive: bool,
}

impl EnumValidator {
    pub fn new(values: &'static [&'static str]) -> Self {
        Self {
            values,
            case_sensitive: true,
        }
    }

    pub fn case_insensitive(values: &'static [&'static str]) -> Self {
        Self {
            values,
            case_sensitive: false,
        }
    }

    fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|allowed| {
            if self.case_sensitive {
                *allowed == value
            } else {
                allowed.eq_ignore_ascii_case(value)
            }
        })
    }
}

impl ValueValidator for EnumValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        matches!(value_type, ValueType::String | ValueType::NonEmptyString)
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        if self.accepts(value) {
            return Ok(());
        }
        Err(
            HeaderError::invalid_as(definition, value, "enum value").with_description(format!(
                "The value must be one of: {}.",
                self.values.join(", ")
            )),
        )
    }
}

/// An array whose elements are all one of a fixed set of strings.
#[derive(Debug, Clone, Copy)]
pub struct EnumArrayValidator {
    values: &'static [&'static str],
}

impl EnumArrayValidator {
    pub fn new(values: &'static [&'static str]) -> Self {
        Self { values }
    }
}

impl ValueValidator for EnumArrayValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::JsonArray
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        let valid = parse_string_array(value)
            .is_some_and(|items| items.iter().all(|item| self.values.contains(&item.as_str())));
        if valid {
            return Ok(());
        }
        Err(HeaderError::invalid_as(definition, value, "JSON array of enum values")
            .with_description(format!(
                "Each element must be one of: {}.",
                self.values.join(", ")
            )))
    }
}

/// An array of strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringArrayValidator;

impl ValueValidator for StringArrayValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::JsonArray
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        parse_string_array(value)
            .map(|_| ())
            .ok_or_else(|| HeaderError::invalid_as(definition, value, "JSON array of strings"))
    }
}

/// An array of acknowledgement requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgementRequestsValidator;

impl ValueValidator for AcknowledgementRequestsValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::JsonArray
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        let invalid = || {
            HeaderError::invalid_as(definition, value, "JSON array of acknowledgement requests")
        };
        let labels = parse_string_array(value).ok_or_else(invalid)?;
        for label in &labels {
            label.parse::<AcknowledgementRequest>().map_err(|e| {
                invalid().with_description(format!(
                    "{e}. Labels consist of 3 to 165 characters out of [A-Za-z0-9-_:]."
                ))
            })?;
        }
        Ok(())
    }
}

/// An array of acknowledgement labels without duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgementLabelsValidator;

impl ValueValidator for AcknowledgementLabelsValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::JsonArray
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        let invalid =
            || HeaderError::invalid_as(definition, value, "JSON array of acknowledgement labels");
        let labels = parse_string_array(value).ok_or_else(invalid)?;
        let mut seen = std::collections::HashSet::new();
        for label in &labels {
            let label = AcknowledgementLabel::new(label.as_str())
                .map_err(|e| invalid().with_description(e.to_string()))?;
            if !seen.insert(label) {
                return Err(invalid().with_description("Declared labels must be unique."));
            }
        }
        Ok(())
    }
}

/// A JSON object in the authorization context format.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationContextValidator;

impl ValueValidator for AuthorizationContextValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::JsonObject
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        AuthorizationContext::from_json_str(value)
            .map(|_| ())
            .map_err(|e| {
                HeaderError::invalid_as(definition, value, "authorization context")
                    .with_description(e.to_string())
            })
    }
}

/// A supported JSON schema version.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaVersionValidator;

impl ValueValidator for SchemaVersionValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::Integer
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        value
            .parse()
            .ok()
            .and_then(JsonSchemaVersion::for_int)
            .map(|_| ())
            .ok_or_else(|| {
                HeaderError::invalid_as(definition, value, "JSON schema version")
                    .with_description("The only supported schema version is 2.")
            })
    }
}

/// A long of at least zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegativeLongValidator;

impl ValueValidator for NonNegativeLongValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::Long
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        match value.parse::<i64>() {
            Ok(number) if number >= 0 => Ok(()),
            _ => Err(HeaderError::invalid_as(definition, value, "non-negative long")),
        }
    }
}

/// An HTTP status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodeValidator;

impl ValueValidator for StatusCodeValidator {
    fn can_validate(&self, value_type: ValueType) -> bool {
        value_type == ValueType::Integer
    }

    fn validate_value(
        &self,
        definition: &dyn HeaderDefinition,
        value: &str,
    ) -> Result<(), HeaderError> {
        match value.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(()),
            _ => Err(HeaderError::invalid_as(definition, value, "HTTP status code")),
        }
    }
}
