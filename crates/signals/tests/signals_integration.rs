//! Integration tests for events travelling with their headers.

use common::{PolicyId, ThingId};
use ditto_headers::{DittoHeaders, HeaderTranslator};
use serde_json::json;
use signals::{Event, EventEnvelope, PolicyEvent, Revision, SignalError, ThingEvent};

mod thing_events {
    use super::*;

    #[test]
    fn event_from_http_keeps_request_headers() {
        let headers = HeaderTranslator::ditto()
            .from_external_headers([("correlation-id", "http-42"), ("x-app", "dashboard")])
            .unwrap();
        let body = json!({
            "type": "things.events:thingCreated",
            "thingId": "org.example:lamp",
            "revision": 1,
            "thing": {"attributes": {"room": "kitchen"}}
        });

        let envelope = EventEnvelope::<ThingEvent>::from_json(&body, headers).unwrap();

        assert_eq!(envelope.entity_id().namespace(), "org.example");
        assert_eq!(envelope.revision(), Revision::first());
        assert_eq!(envelope.headers().correlation_id(), Some("http-42"));
        assert_eq!(envelope.etag().to_string(), "\"rev:1\"");
        assert!(matches!(envelope.event(), ThingEvent::ThingCreated { .. }));

        let json = envelope.to_json().unwrap();
        assert_eq!(json, body);
    }

    #[test]
    fn subsequent_events_advance_revision() {
        let thing_id = ThingId::of("org.example", "lamp").unwrap();
        let mut revision = Revision::initial();
        let events = [
            ThingEvent::ThingCreated { thing: json!({}) },
            ThingEvent::AttributeModified {
                attribute: "/on".into(),
                value: json!(true),
            },
            ThingEvent::ThingDeleted,
        ];

        let envelopes: Vec<_> = events
            .into_iter()
            .map(|event| {
                revision = revision.next();
                EventEnvelope::builder()
                    .event(event)
                    .entity_id(thing_id.clone())
                    .revision(revision)
                    .build()
            })
            .collect();

        assert_eq!(envelopes.last().unwrap().revision(), Revision::new(3));
        assert_eq!(
            envelopes.last().unwrap().event_type(),
            "things.events:thingDeleted"
        );
    }
}

mod policy_events {
    use super::*;

    #[test]
    fn policy_events_use_policy_id_field() {
        let envelope = EventEnvelope::builder()
            .event(PolicyEvent::PolicyCreated {
                policy: json!({"entries": {}}),
            })
            .entity_id(PolicyId::new("org.example:policy").unwrap())
            .revision(Revision::first())
            .headers(DittoHeaders::builder().random_correlation_id().build())
            .build();

        let json = envelope.to_json().unwrap();
        assert_eq!(json[PolicyEvent::ENTITY_ID_FIELD], "org.example:policy");
        assert_eq!(json["type"], "policies.events:policyCreated");
        assert!(json.get("correlation-id").is_none());
    }

    #[test]
    fn thing_json_is_not_a_policy_event() {
        let body = json!({
            "type": "things.events:thingDeleted",
            "policyId": "org.example:policy",
            "revision": 2
        });
        let err = EventEnvelope::<PolicyEvent>::from_json(&body, DittoHeaders::empty()).unwrap_err();
        assert!(matches!(err, SignalError::UnknownType(ref t) if t == "things.events:thingDeleted"));
        assert_eq!(err.to_json()["status"], 400);
    }
}
