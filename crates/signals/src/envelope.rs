//! Events together with the entity they belong to and their headers.

use chrono::{DateTime, Utc};
use common::EntityTag;
use ditto_headers::DittoHeaders;
use serde_json::{Map, Value};

use crate::error::SignalError;
use crate::event::Event;
use crate::revision::Revision;

const TYPE_FIELD: &str = "type";
const REVISION_FIELD: &str = "revision";
const TIMESTAMP_FIELD: &str = "_timestamp";

/// An event of entity `entity_id` at `revision`, with the headers of the
/// command that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope<E: Event> {
    event: E,
    entity_id: E::EntityId,
    revision: Revision,
    timestamp: Option<DateTime<Utc>>,
    headers: DittoHeaders,
}

impl<E: Event> EventEnvelope<E> {
    pub fn builder() -> EventEnvelopeBuilder<E> {
        EventEnvelopeBuilder::default()
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }

    pub fn entity_id(&self) -> &E::EntityId {
        &self.entity_id
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn headers(&self) -> &DittoHeaders {
        &self.headers
    }

    /// Returns a copy carrying `headers` instead of the current ones.
    pub fn with_headers(&self, headers: DittoHeaders) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    /// Tags the event is stored with in the journal.
    pub fn journal_tags(&self) -> Vec<String> {
        self.headers.journal_tags()
    }

    /// The entity tag of the entity after this event.
    pub fn etag(&self) -> EntityTag {
        EntityTag::from_revision(self.revision.as_i64())
    }

    /// Renders the event as JSON. Headers are not part of it.
    pub fn to_json(&self) -> Result<Value, SignalError> {
        let mut object = Map::new();
        object.insert(TYPE_FIELD.to_string(), Value::from(self.event_type()));
        object.insert(
            E::ENTITY_ID_FIELD.to_string(),
            Value::from(self.entity_id.to_string()),
        );
        object.insert(
            REVISION_FIELD.to_string(),
            Value::from(self.revision.as_i64()),
        );
        if let Some(timestamp) = self.timestamp {
            object.insert(
                TIMESTAMP_FIELD.to_string(),
                Value::from(timestamp.to_rfc3339()),
            );
        }

        if let Value::Object(fields) = serde_json::to_value(&self.event)? {
            for (key, value) in fields {
                object.entry(key).or_insert(value);
            }
        }
        Ok(Value::Object(object))
    }

    /// Parses an event from JSON produced by [`EventEnvelope::to_json`].
    #[tracing::instrument(skip_all, fields(id_field = E::ENTITY_ID_FIELD))]
    pub fn from_json(json: &Value, headers: DittoHeaders) -> Result<Self, SignalError> {
        let mut object = json
            .as_object()
            .cloned()
            .ok_or(SignalError::InvalidField {
                field: TYPE_FIELD,
                reason: "the event is not a JSON object".to_string(),
            })?;

        let event_type = object
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .ok_or(SignalError::MissingField(TYPE_FIELD))?;
        if !E::TYPES.contains(&event_type) {
            tracing::debug!(event_type, "rejecting unknown event type");
            return Err(SignalError::UnknownType(event_type.to_string()));
        }

        let raw_id = object
            .remove(E::ENTITY_ID_FIELD)
            .ok_or(SignalError::MissingField(E::ENTITY_ID_FIELD))?;
        let raw_id = raw_id.as_str().ok_or(SignalError::InvalidField {
            field: E::ENTITY_ID_FIELD,
            reason: "expected a string".to_string(),
        })?;
        let entity_id = raw_id
            .parse()
            .map_err(|source| SignalError::InvalidEntityId {
                id: raw_id.to_string(),
                source,
            })?;

        let revision = object
            .remove(REVISION_FIELD)
            .ok_or(SignalError::MissingField(REVISION_FIELD))?
            .as_i64()
            .map(Revision::new)
            .ok_or(SignalError::InvalidField {
                field: REVISION_FIELD,
                reason: "expected an integer".to_string(),
            })?;

        let timestamp = match object.remove(TIMESTAMP_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| SignalError::InvalidField {
                        field: TIMESTAMP_FIELD,
                        reason: e.to_string(),
                    })?
                    .with_timezone(&Utc),
            ),
            Some(_) => {
                return Err(SignalError::InvalidField {
                    field: TIMESTAMP_FIELD,
                    reason: "expected an RFC 3339 string".to_string(),
                });
            }
        };

        let event = serde_json::from_value(Value::Object(object))?;

        Ok(Self {
            event,
            entity_id,
            revision,
            timestamp,
            headers,
        })
    }
}

/// Builder for [`EventEnvelope`].
#[derive(Debug)]
pub struct EventEnvelopeBuilder<E: Event> {
    event: Option<E>,
    entity_id: Option<E::EntityId>,
    revision: Option<Revision>,
    timestamp: Option<DateTime<Utc>>,
    headers: DittoHeaders,
}

impl<E: Event> Default for EventEnvelopeBuilder<E> {
    fn default() -> Self {
        Self {
            event: None,
            entity_id: None,
            revision: None,
            timestamp: None,
            headers: DittoHeaders::empty(),
        }
    }
}

impl<E: Event> EventEnvelopeBuilder<E> {
    pub fn event(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    pub fn entity_id(mut self, id: E::EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn revision(mut self, revision: Revision) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Sets the timestamp. Events without one are allowed.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the headers. Defaults to empty headers.
    pub fn headers(mut self, headers: DittoHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Builds the envelope.
    ///
    /// # Panics
    ///
    /// Panics if event, entity_id or revision are not set.
    pub fn build(self) -> EventEnvelope<E> {
        EventEnvelope {
            event: self.event.expect("event is required"),
            entity_id: self.entity_id.expect("entity_id is required"),
            revision: self.revision.expect("revision is required"),
            timestamp: self.timestamp,
            headers: self.headers,
        }
    }

    /// Tries to build the envelope, returning None if required fields are missing.
    pub fn try_build(self) -> Option<EventEnvelope<E>> {
        Some(EventEnvelope {
            event: self.event?,
            entity_id: self.entity_id?,
            revision: self.revision?,
            timestamp: self.timestamp,
            headers: self.headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use common::ThingId;
    use serde_json::json;

    use super::*;
    use crate::ThingEvent;

    fn thing_id() -> ThingId {
        ThingId::new("org.example:sensor-1").unwrap()
    }

    #[test]
    fn test_builder_creates_envelope() {
        let envelope = EventEnvelope::builder()
            .event(ThingEvent::ThingDeleted)
            .entity_id(thing_id())
            .revision(Revision::new(3))
            .build();

        assert_eq!(envelope.event_type(), "things.events:thingDeleted");
        assert_eq!(envelope.entity_id(), &thing_id());
        assert_eq!(envelope.revision(), Revision::new(3));
        assert!(envelope.timestamp().is_none());
        assert!(envelope.headers().is_empty());
    }

    #[test]
    fn test_try_build_returns_none_when_missing_fields() {
        let result = EventEnvelope::<ThingEvent>::builder()
            .event(ThingEvent::ThingDeleted)
            .try_build();
        assert!(result.is_none());
    }

    #[test]
    #[should_panic(expected = "revision is required")]
    fn test_build_panics_without_revision() {
        EventEnvelope::builder()
            .event(ThingEvent::ThingDeleted)
            .entity_id(thing_id())
            .build();
    }

    #[test]
    fn test_etag_and_journal_tags() {
        let headers = DittoHeaders::builder()
            .journal_tags(&["sensor", "building-a"])
            .build();
        let envelope = EventEnvelope::builder()
            .event(ThingEvent::ThingDeleted)
            .entity_id(thing_id())
            .revision(Revision::new(9))
            .headers(headers)
            .build();

        assert_eq!(envelope.etag().to_string(), "\"rev:9\"");
        assert_eq!(envelope.journal_tags(), vec!["sensor", "building-a"]);
    }

    #[test]
    fn test_with_headers_replaces_only_headers() {
        let envelope = EventEnvelope::builder()
            .event(ThingEvent::ThingDeleted)
            .entity_id(thing_id())
            .revision(Revision::first())
            .build();
        let headers = DittoHeaders::builder().dry_run(true).build();

        let copy = envelope.with_headers(headers.clone());
        assert_eq!(copy.headers(), &headers);
        assert_eq!(copy.revision(), envelope.revision());
        assert!(envelope.headers().is_empty());
    }

    #[test]
    fn test_json_round_trip_keeps_fields() {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let envelope = EventEnvelope::builder()
            .event(ThingEvent::AttributeModified {
                attribute: "/temperature".into(),
                value: json!(21.5),
            })
            .entity_id(thing_id())
            .revision(Revision::new(4))
            .timestamp(timestamp)
            .build();

        let json = envelope.to_json().unwrap();
        assert_eq!(
            json,
            json!({
                "type": "things.events:attributeModified",
                "thingId": "org.example:sensor-1",
                "revision": 4,
                "_timestamp": "2024-03-01T10:00:00+00:00",
                "attribute": "/temperature",
                "value": 21.5
            })
        );

        let back = EventEnvelope::<ThingEvent>::from_json(&json, DittoHeaders::empty()).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn test_from_json_errors() {
        let missing_revision = json!({
            "type": "things.events:thingDeleted",
            "thingId": "org.example:sensor-1"
        });
        assert!(matches!(
            EventEnvelope::<ThingEvent>::from_json(&missing_revision, DittoHeaders::empty()),
            Err(SignalError::MissingField("revision"))
        ));

        let bad_id = json!({
            "type": "things.events:thingDeleted",
            "thingId": "no-separator",
            "revision": 1
        });
        assert!(matches!(
            EventEnvelope::<ThingEvent>::from_json(&bad_id, DittoHeaders::empty()),
            Err(SignalError::InvalidEntityId { .. })
        ));

        let policy_type = json!({
            "type": "policies.events:policyDeleted",
            "thingId": "org.example:sensor-1",
            "revision": 1
        });
        assert!(matches!(
            EventEnvelope::<ThingEvent>::from_json(&policy_type, DittoHeaders::empty()),
            Err(SignalError::UnknownType(_))
        ));

        let missing_payload = json!({
            "type": "things.events:attributeDeleted",
            "thingId": "org.example:sensor-1",
            "revision": 1
        });
        assert!(matches!(
            EventEnvelope::<ThingEvent>::from_json(&missing_payload, DittoHeaders::empty()),
            Err(SignalError::Json(_))
        ));
    }
}
