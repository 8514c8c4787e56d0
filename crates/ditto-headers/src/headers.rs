//! The immutable header map carried by every signal.

use chrono::{DateTime, FixedOffset};
use common::{
    AcknowledgementLabel, AcknowledgementRequest, AuthorizationContext, AuthorizationSubject,
    DittoDuration, EntityTag, EntityTagMatchers,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::HeadersConfig;
use crate::definition::{DittoHeaderDefinition, HeaderDefinition};
use crate::error::HeaderError;
use crate::map::CaseInsensitiveHeaders;
use crate::message::MessageHeaderDefinition;
use crate::options::{
    Channel, IfEqual, JsonSchemaVersion, LiveChannelTimeoutStrategy, ResponseType,
};
use crate::value_type::parse_string_array;

type Def = DittoHeaderDefinition;

/// Validated, case-insensitive headers.
///
/// Values of well-known headers are guaranteed to pass their definition's
/// validator. Unknown headers are carried along unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DittoHeaders {
    headers: CaseInsensitiveHeaders,
}

impl DittoHeaders {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> DittoHeadersBuilder {
        DittoHeadersBuilder::default()
    }

    /// Returns a builder pre-filled with these headers.
    pub fn to_builder(&self) -> DittoHeadersBuilder {
        DittoHeadersBuilder {
            headers: self.headers.clone(),
        }
    }

    /// Builds headers from raw key/value pairs, validating known headers.
    pub fn from_map<I, K, V>(entries: I) -> Result<Self, HeaderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries
            .into_iter()
            .try_fold(Self::builder(), |builder, (key, value)| {
                builder.put_header(key, value)
            })
            .map(DittoHeadersBuilder::build)
    }

    /// Parses headers from a JSON object.
    ///
    /// String values are taken verbatim, any other value as its compact JSON
    /// text.
    pub fn from_json(json: &Value) -> Result<Self, HeaderError> {
        let object = json.as_object().ok_or(HeaderError::NotAnObject)?;
        Self::from_map(object.iter().map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), raw)
        }))
    }

    /// Wraps already validated headers.
    pub(crate) fn from_validated(headers: CaseInsensitiveHeaders) -> Self {
        Self { headers }
    }

    /// Renders the headers as JSON object, each value in the JSON type of
    /// its definition.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .headers
            .iter()
            .map(|(key, value)| {
                let json = match DittoHeaderDefinition::for_key(key) {
                    Some(definition) => definition.serialization_type().render(value),
                    None => match MessageHeaderDefinition::for_key(key) {
                        Some(definition) => definition.serialization_type().render(value),
                        None => Value::String(value.to_string()),
                    },
                };
                (key.to_string(), json)
            })
            .collect();
        Value::Object(object)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterates `(original-case key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter()
    }

    /// Sum of key and value byte lengths.
    pub fn byte_size(&self) -> usize {
        self.headers.byte_size()
    }

    /// Keeps the smallest headers that fit into `max_bytes`.
    pub fn truncate(&self, max_bytes: usize) -> DittoHeaders {
        let truncated = self.headers.truncate(max_bytes);
        let dropped = self.headers.len() - truncated.len();
        if dropped > 0 {
            tracing::debug!(
                dropped,
                max_bytes,
                size = self.byte_size(),
                "truncated headers"
            );
            metrics::counter!("headers_truncated_total").increment(1);
        }
        DittoHeaders { headers: truncated }
    }

    /// Fails if the headers exceed the configured size or subject count.
    pub fn check_limits(&self, config: &HeadersConfig) -> Result<(), HeaderError> {
        let size = self.byte_size();
        if size > config.max_bytes {
            return Err(HeaderError::TooLarge {
                size,
                max: config.max_bytes,
            });
        }
        let count = self.authorization_context().len();
        if count > config.max_auth_subjects {
            return Err(HeaderError::TooManyAuthSubjects {
                count,
                max: config.max_auth_subjects,
            });
        }
        Ok(())
    }

    fn value_of(&self, definition: DittoHeaderDefinition) -> Option<&str> {
        self.headers.get(definition.key())
    }

    fn parsed<T: std::str::FromStr>(&self, definition: DittoHeaderDefinition) -> Option<T> {
        self.value_of(definition)?.parse().ok()
    }

    fn flag(&self, definition: DittoHeaderDefinition, default: bool) -> bool {
        self.parsed(definition).unwrap_or(default)
    }

    fn strings(&self, definition: DittoHeaderDefinition) -> Vec<String> {
        self.value_of(definition)
            .and_then(parse_string_array)
            .unwrap_or_default()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.value_of(Def::CorrelationId)
    }

    pub fn schema_version(&self) -> Option<JsonSchemaVersion> {
        self.parsed(Def::SchemaVersion)
            .and_then(JsonSchemaVersion::for_int)
    }

    /// Defaults to `true`.
    pub fn is_response_required(&self) -> bool {
        self.flag(Def::ResponseRequired, true)
    }

    pub fn is_dry_run(&self) -> bool {
        self.flag(Def::DryRun, false)
    }

    pub fn channel(&self) -> Option<Channel> {
        self.parsed(Def::Channel)
    }

    pub fn origin(&self) -> Option<&str> {
        self.value_of(Def::Origin)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.value_of(Def::ContentType)
    }

    pub fn reply_target(&self) -> Option<i32> {
        self.parsed(Def::ReplyTarget)
    }

    /// The authorization context, empty if the header is absent.
    pub fn authorization_context(&self) -> AuthorizationContext {
        self.value_of(Def::AuthorizationContext)
            .and_then(|json| AuthorizationContext::from_json_str(json).ok())
            .unwrap_or_default()
    }

    pub fn acknowledgement_requests(&self) -> Vec<AcknowledgementRequest> {
        self.strings(Def::RequestedAcks)
            .iter()
            .filter_map(|label| label.parse().ok())
            .collect()
    }

    pub fn declared_acknowledgements(&self) -> Vec<AcknowledgementLabel> {
        self.strings(Def::DeclaredAcks)
            .iter()
            .filter_map(|label| label.parse().ok())
            .collect()
    }

    pub fn timeout(&self) -> Option<DittoDuration> {
        self.parsed(Def::Timeout)
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.value_of(Def::EntityId)
    }

    pub fn etag(&self) -> Option<EntityTag> {
        self.parsed(Def::ETag)
    }

    pub fn if_match(&self) -> Option<EntityTagMatchers> {
        self.parsed(Def::IfMatch)
    }

    pub fn if_none_match(&self) -> Option<EntityTagMatchers> {
        self.parsed(Def::IfNoneMatch)
    }

    /// Defaults to [`IfEqual::Update`].
    pub fn if_equal(&self) -> IfEqual {
        self.parsed(Def::IfEqual).unwrap_or(IfEqual::Update)
    }

    pub fn read_granted_subjects(&self) -> Vec<AuthorizationSubject> {
        self.strings(Def::ReadGrantedSubjects)
            .into_iter()
            .filter_map(|subject| AuthorizationSubject::new(subject).ok())
            .collect()
    }

    pub fn journal_tags(&self) -> Vec<String> {
        self.strings(Def::EventJournalTags)
    }

    pub fn put_metadata(&self) -> Option<Value> {
        self.value_of(Def::PutMetadata)
            .map(|raw| Def::PutMetadata.serialization_type().render(raw))
    }

    pub fn get_metadata(&self) -> Option<&str> {
        self.value_of(Def::GetMetadata)
    }

    pub fn delete_metadata(&self) -> Option<&str> {
        self.value_of(Def::DeleteMetadata)
    }

    pub fn is_allow_policy_lockout(&self) -> bool {
        self.flag(Def::AllowPolicyLockout, false)
    }

    pub fn condition(&self) -> Option<&str> {
        self.value_of(Def::Condition)
    }

    pub fn live_channel_condition(&self) -> Option<&str> {
        self.value_of(Def::LiveChannelCondition)
    }

    pub fn live_channel_timeout_strategy(&self) -> Option<LiveChannelTimeoutStrategy> {
        self.parsed(Def::LiveChannelTimeoutStrategy)
    }

    pub fn originator(&self) -> Option<&str> {
        self.value_of(Def::Originator)
    }

    pub fn is_weak_ack(&self) -> bool {
        self.flag(Def::WeakAck, false)
    }

    pub fn expected_response_types(&self) -> Vec<ResponseType> {
        self.strings(Def::ExpectedResponseTypes)
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect()
    }

    pub fn is_sudo(&self) -> bool {
        self.flag(Def::Sudo, false)
    }

    pub fn at_historical_revision(&self) -> Option<i64> {
        self.parsed(Def::AtHistoricalRevision)
    }

    pub fn at_historical_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.value_of(Def::AtHistoricalTimestamp)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn trace_parent(&self) -> Option<&str> {
        self.value_of(Def::TraceParent)
    }
}

impl Serialize for DittoHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DittoHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        DittoHeaders::from_json(&json).map_err(serde::de::Error::custom)
    }
}

/// Builder for [`DittoHeaders`].
///
/// Typed setters cannot produce invalid values. Raw values go through
/// [`DittoHeadersBuilder::put_header`], which validates known headers.
#[derive(Debug, Clone, Default)]
pub struct DittoHeadersBuilder {
    headers: CaseInsensitiveHeaders,
}

impl DittoHeadersBuilder {
    fn set(mut self, definition: DittoHeaderDefinition, value: impl Into<String>) -> Self {
        self.headers.insert(definition.key(), value);
        self
    }

    fn set_array<T: ToString>(self, definition: DittoHeaderDefinition, items: &[T]) -> Self {
        let array: Vec<Value> = items
            .iter()
            .map(|item| Value::String(item.to_string()))
            .collect();
        self.set(definition, Value::Array(array).to_string())
    }

    /// Puts a raw header, validating it if its key is a known header.
    pub fn put_header(
        self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, HeaderError> {
        let key = key.into();
        let value = value.into();
        if let Some(definition) = DittoHeaderDefinition::for_key(&key) {
            definition.validate_value(&value).inspect_err(|_| {
                metrics::counter!("headers_validation_failures_total", "header" => definition.key())
                    .increment(1);
            })?;
        }
        let mut builder = self;
        builder.headers.insert(key, value);
        Ok(builder)
    }

    /// Puts all raw headers, stopping at the first invalid one.
    pub fn put_headers<I, K, V>(self, entries: I) -> Result<Self, HeaderError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries
            .into_iter()
            .try_fold(self, |builder, (key, value)| builder.put_header(key, value))
    }

    pub fn remove_header(mut self, key: &str) -> Self {
        self.headers.remove(key);
        self
    }

    /// Sets a non-empty correlation id.
    pub fn correlation_id(self, id: impl Into<String>) -> Result<Self, HeaderError> {
        self.put_header(Def::CorrelationId.key(), id)
    }

    /// Sets a random UUID as correlation id.
    pub fn random_correlation_id(self) -> Self {
        self.set(Def::CorrelationId, uuid::Uuid::new_v4().to_string())
    }

    pub fn schema_version(self, version: JsonSchemaVersion) -> Self {
        self.set(Def::SchemaVersion, version.to_string())
    }

    pub fn response_required(self, required: bool) -> Self {
        self.set(Def::ResponseRequired, required.to_string())
    }

    pub fn dry_run(self, dry_run: bool) -> Self {
        self.set(Def::DryRun, dry_run.to_string())
    }

    pub fn channel(self, channel: Channel) -> Self {
        self.set(Def::Channel, channel.as_str())
    }

    pub fn origin(self, origin: impl Into<String>) -> Self {
        self.set(Def::Origin, origin)
    }

    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.set(Def::ContentType, content_type)
    }

    pub fn reply_target(self, target: i32) -> Self {
        self.set(Def::ReplyTarget, target.to_string())
    }

    pub fn authorization_context(self, context: &AuthorizationContext) -> Self {
        let json = serde_json::json!({
            "type": context.context_type,
            "subjects": context.subjects.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        });
        self.set(Def::AuthorizationContext, json.to_string())
    }

    pub fn acknowledgement_requests(self, requests: &[AcknowledgementRequest]) -> Self {
        self.set_array(Def::RequestedAcks, requests)
    }

    pub fn declared_acknowledgements(self, labels: &[AcknowledgementLabel]) -> Self {
        self.set_array(Def::DeclaredAcks, labels)
    }

    pub fn timeout(self, timeout: DittoDuration) -> Self {
        self.set(Def::Timeout, timeout.to_string())
    }

    pub fn entity_id(self, id: impl Into<String>) -> Self {
        self.set(Def::EntityId, id)
    }

    pub fn etag(self, tag: &EntityTag) -> Self {
        self.set(Def::ETag, tag.to_string())
    }

    pub fn if_match(self, matchers: &EntityTagMatchers) -> Self {
        self.set(Def::IfMatch, matchers.to_string())
    }

    pub fn if_none_match(self, matchers: &EntityTagMatchers) -> Self {
        self.set(Def::IfNoneMatch, matchers.to_string())
    }

    pub fn if_equal(self, if_equal: IfEqual) -> Self {
        self.set(Def::IfEqual, if_equal.as_str())
    }

    pub fn read_granted_subjects(self, subjects: &[AuthorizationSubject]) -> Self {
        self.set_array(Def::ReadGrantedSubjects, subjects)
    }

    pub fn journal_tags<T: ToString>(self, tags: &[T]) -> Self {
        self.set_array(Def::EventJournalTags, tags)
    }

    pub fn allow_policy_lockout(self, allow: bool) -> Self {
        self.set(Def::AllowPolicyLockout, allow.to_string())
    }

    pub fn condition(self, condition: impl Into<String>) -> Result<Self, HeaderError> {
        self.put_header(Def::Condition.key(), condition)
    }

    pub fn live_channel_condition(self, condition: impl Into<String>) -> Result<Self, HeaderError> {
        self.put_header(Def::LiveChannelCondition.key(), condition)
    }

    pub fn live_channel_timeout_strategy(self, strategy: LiveChannelTimeoutStrategy) -> Self {
        self.set(Def::LiveChannelTimeoutStrategy, strategy.as_str())
    }

    pub fn originator(self, originator: &AuthorizationSubject) -> Self {
        self.set(Def::Originator, originator.as_str())
    }

    pub fn weak_ack(self, weak: bool) -> Self {
        self.set(Def::WeakAck, weak.to_string())
    }

    pub fn expected_response_types(self, types: &[ResponseType]) -> Self {
        self.set_array(Def::ExpectedResponseTypes, types)
    }

    pub fn sudo(self, sudo: bool) -> Self {
        self.set(Def::Sudo, sudo.to_string())
    }

    /// Sets the revision to read at; negative revisions are rejected.
    pub fn at_historical_revision(self, revision: i64) -> Result<Self, HeaderError> {
        self.put_header(Def::AtHistoricalRevision.key(), revision.to_string())
    }

    pub fn at_historical_timestamp(self, timestamp: DateTime<FixedOffset>) -> Self {
        self.set(Def::AtHistoricalTimestamp, timestamp.to_rfc3339())
    }

    pub fn trace_parent(self, trace_parent: impl Into<String>) -> Self {
        self.set(Def::TraceParent, trace_parent)
    }

    pub fn build(self) -> DittoHeaders {
        DittoHeaders {
            headers: self.headers,
        }
    }
}
