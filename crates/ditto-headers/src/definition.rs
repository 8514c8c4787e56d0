//! Header definitions: key, value type, visibility and validation.

use crate::error::HeaderError;
use crate::options::{Channel, IfEqual, LiveChannelTimeoutStrategy, ResponseType};
use crate::validators::{
    AcknowledgementLabelsValidator, AcknowledgementRequestsValidator,
    AuthorizationContextValidator, EnumArrayValidator, EnumValidator, NonNegativeLongValidator,
    SchemaVersionValidator, StringArrayValidator, ValueValidator, default_validator,
};
use crate::value_type::{JsonType, ValueType};

/// Describes one well-known header.
pub trait HeaderDefinition: Send + Sync + std::fmt::Debug {
    /// The lower-case header key.
    fn key(&self) -> &'static str;

    /// The type the value has to parse as.
    fn value_type(&self) -> ValueType;

    /// The JSON type the value is rendered as.
    fn serialization_type(&self) -> JsonType {
        self.value_type().serialization_type()
    }

    /// Whether the header is accepted from external sources such as HTTP
    /// requests or connections.
    fn should_read_from_external(&self) -> bool;

    /// Whether the header is passed on to external recipients.
    fn should_write_to_external(&self) -> bool;

    /// Checks a raw value against this definition.
    fn validate_value(&self, value: &str) -> Result<(), HeaderError>;
}

/// The headers every signal may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DittoHeaderDefinition {
    AuthorizationContext,
    CorrelationId,
    SchemaVersion,
    ResponseRequired,
    DryRun,
    Channel,
    Origin,
    ContentType,
    ReplyTarget,
    RequestedAcks,
    DeclaredAcks,
    Timeout,
    EntityId,
    ETag,
    IfMatch,
    IfNoneMatch,
    IfEqual,
    ReadGrantedSubjects,
    EventJournalTags,
    PutMetadata,
    GetMetadata,
    DeleteMetadata,
    AllowPolicyLockout,
    Condition,
    LiveChannelCondition,
    LiveChannelTimeoutStrategy,
    Originator,
    WeakAck,
    ExpectedResponseTypes,
    Sudo,
    AtHistoricalRevision,
    AtHistoricalTimestamp,
    TraceParent,
}

static DITTO_HEADER_DEFINITIONS: [DittoHeaderDefinition; 33] = [
    DittoHeaderDefinition::AuthorizationContext,
    DittoHeaderDefinition::CorrelationId,
    DittoHeaderDefinition::SchemaVersion,
    DittoHeaderDefinition::ResponseRequired,
    DittoHeaderDefinition::DryRun,
    DittoHeaderDefinition::Channel,
    DittoHeaderDefinition::Origin,
    DittoHeaderDefinition::ContentType,
    DittoHeaderDefinition::ReplyTarget,
    DittoHeaderDefinition::RequestedAcks,
    DittoHeaderDefinition::DeclaredAcks,
    DittoHeaderDefinition::Timeout,
    DittoHeaderDefinition::EntityId,
    DittoHeaderDefinition::ETag,
    DittoHeaderDefinition::IfMatch,
    DittoHeaderDefinition::IfNoneMatch,
    DittoHeaderDefinition::IfEqual,
    DittoHeaderDefinition::ReadGrantedSubjects,
    DittoHeaderDefinition::EventJournalTags,
    DittoHeaderDefinition::PutMetadata,
    DittoHeaderDefinition::GetMetadata,
    DittoHeaderDefinition::DeleteMetadata,
    DittoHeaderDefinition::AllowPolicyLockout,
    DittoHeaderDefinition::Condition,
    DittoHeaderDefinition::LiveChannelCondition,
    DittoHeaderDefinition::LiveChannelTimeoutStrategy,
    DittoHeaderDefinition::Originator,
    DittoHeaderDefinition::WeakAck,
    DittoHeaderDefinition::ExpectedResponseTypes,
    DittoHeaderDefinition::Sudo,
    DittoHeaderDefinition::AtHistoricalRevision,
    DittoHeaderDefinition::AtHistoricalTimestamp,
    DittoHeaderDefinition::TraceParent,
];

/// Key, value type, read-from-external and write-to-external flags.
type Properties = (&'static str, ValueType, bool, bool);

impl DittoHeaderDefinition {
    /// All definitions in declaration order.
    pub fn all() -> &'static [DittoHeaderDefinition] {
        &DITTO_HEADER_DEFINITIONS
    }

    /// Looks up a definition by key, ignoring case.
    pub fn for_key(key: &str) -> Option<DittoHeaderDefinition> {
        DITTO_HEADER_DEFINITIONS
            .iter()
            .copied()
            .find(|definition| definition.key().eq_ignore_ascii_case(key))
    }

    fn properties(self) -> Properties {
        use ValueType as T;

        match self {
            Self::AuthorizationContext => ("ditto-auth-context", T::JsonObject, false, false),
            Self::CorrelationId => ("correlation-id", T::NonEmptyString, true, true),
            Self::SchemaVersion => ("version", T::Integer, true, true),
            Self::ResponseRequired => ("response-required", T::Boolean, true, true),
            Self::DryRun => ("dry-run", T::Boolean, true, false),
            Self::Channel => ("channel", T::String, true, true),
            Self::Origin => ("ditto-origin", T::String, false, true),
            Self::ContentType => ("content-type", T::String, true, true),
            Self::ReplyTarget => ("ditto-reply-target", T::Integer, false, false),
            Self::RequestedAcks => ("requested-acks", T::JsonArray, true, true),
            Self::DeclaredAcks => ("declared-acks", T::JsonArray, true, false),
            Self::Timeout => ("timeout", T::Duration, true, true),
            Self::EntityId => ("ditto-entity-id", T::String, false, false),
            Self::ETag => ("etag", T::EntityTag, true, true),
            Self::IfMatch => ("if-match", T::EntityTagMatchers, true, false),
            Self::IfNoneMatch => ("if-none-match", T::EntityTagMatchers, true, false),
            Self::IfEqual => ("if-equal", T::String, true, false),
            Self::ReadGrantedSubjects => ("ditto-read-subjects", T::JsonArray, false, false),
            Self::EventJournalTags => ("ditto-event-journal-tags", T::JsonArray, false, false),
            Self::PutMetadata => ("put-metadata", T::JsonArray, true, false),
            Self::GetMetadata => ("get-metadata", T::String, true, false),
            Self::DeleteMetadata => ("delete-metadata", T::String, true, false),
            Self::AllowPolicyLockout => ("allow-policy-lockout", T::Boolean, true, false),
            Self::Condition => ("condition", T::NonEmptyString, true, false),
            Self::LiveChannelCondition => ("live-channel-condition", T::NonEmptyString, true, false),
            Self::LiveChannelTimeoutStrategy => {
                ("live-channel-timeout-strategy", T::String, true, false)
            }
            Self::Originator => ("ditto-originator", T::String, false, false),
            Self::WeakAck => ("ditto-weak-ack", T::Boolean, false, true),
            Self::ExpectedResponseTypes => ("ditto-expected-response-types", T::JsonArray, false, false),
            Self::Sudo => ("ditto-sudo", T::Boolean, false, false),
            Self::AtHistoricalRevision => ("at-historical-revision", T::Long, true, false),
            Self::AtHistoricalTimestamp => ("at-historical-timestamp", T::Timestamp, true, false),
            Self::TraceParent => ("traceparent", T::String, true, true),
        }
    }
}

impl HeaderDefinition for DittoHeaderDefinition {
    fn key(&self) -> &'static str {
        self.properties().0
    }

    fn value_type(&self) -> ValueType {
        self.properties().1
    }

    fn should_read_from_external(&self) -> bool {
        self.properties().2
    }

    fn should_write_to_external(&self) -> bool {
        self.properties().3
    }

    fn validate_value(&self, value: &str) -> Result<(), HeaderError> {
        let base = default_validator();
        match self {
            DittoHeaderDefinition::AuthorizationContext => {
                base.and_then(AuthorizationContextValidator).validate(self, value)
            }
            DittoHeaderDefinition::SchemaVersion => {
                base.and_then(SchemaVersionValidator).validate(self, value)
            }
            DittoHeaderDefinition::Channel => base
                .and_then(EnumValidator::new(Channel::VALUES))
                .validate(self, value),
            DittoHeaderDefinition::RequestedAcks => base
                .and_then(AcknowledgementRequestsValidator)
                .validate(self, value),
            DittoHeaderDefinition::DeclaredAcks => base
                .and_then(AcknowledgementLabelsValidator)
                .validate(self, value),
            DittoHeaderDefinition::IfEqual => base
                .and_then(EnumValidator::new(IfEqual::VALUES))
                .validate(self, value),
            DittoHeaderDefinition::ReadGrantedSubjects
            | DittoHeaderDefinition::EventJournalTags => {
                base.and_then(StringArrayValidator).validate(self, value)
            }
            DittoHeaderDefinition::LiveChannelTimeoutStrategy => base
                .and_then(EnumValidator::new(LiveChannelTimeoutStrategy::VALUES))
                .validate(self, value),
            DittoHeaderDefinition::ExpectedResponseTypes => base
                .and_then(EnumArrayValidator::new(ResponseType::VALUES))
                .validate(self, value),
            DittoHeaderDefinition::AtHistoricalRevision => base
                .and_then(NonNegativeLongValidator)
                .validate(self, value),
            _ => base.validate(self, value),
        }
    }
}

impl std::fmt::Display for DittoHeaderDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
