//! Integration tests for header construction, translation and limits.

use common::{AuthorizationContext, AuthorizationSubject, EntityTag};
use ditto_headers::{
    Channel, DittoHeaderDefinition, DittoHeaders, HeaderDefinition, HeaderError, HeaderTranslator,
    HeadersConfig, RequestKind, check_preconditions,
};
use serde_json::json;

fn context_with_subjects(count: usize) -> AuthorizationContext {
    AuthorizationContext::new(
        AuthorizationContext::PRE_AUTHENTICATED_HTTP,
        (0..count).map(|i| AuthorizationSubject::new(format!("nginx:user-{i}")).unwrap()),
    )
}

mod http_request_flow {
    use super::*;

    #[test]
    fn external_request_headers_become_ditto_headers() {
        let translator = HeaderTranslator::ditto();
        let headers = translator
            .from_external_headers([
                ("Correlation-Id", "req-1"),
                ("Response-Required", "false"),
                ("Requested-Acks", "twin-persisted,my-connection:custom"),
                ("Timeout", "250ms"),
                ("Channel", "live"),
                ("ditto-sudo", "true"),
                ("Accept", "application/json"),
            ])
            .unwrap();

        assert_eq!(headers.correlation_id(), Some("req-1"));
        assert!(!headers.is_response_required());
        assert_eq!(headers.acknowledgement_requests().len(), 2);
        assert_eq!(
            headers.timeout().unwrap().as_duration(),
            std::time::Duration::from_millis(250)
        );
        assert_eq!(headers.channel(), Some(Channel::Live));
        assert!(!headers.is_sudo());
        assert_eq!(headers.get("accept"), Some("application/json"));
    }

    #[test]
    fn invalid_external_header_is_reported_in_error_json() {
        let translator = HeaderTranslator::ditto();
        let err = translator
            .from_external_headers([("timeout", "forever")])
            .unwrap_err();

        assert_eq!(
            err.to_json(),
            json!({
                "status": 400,
                "error": "header.invalid",
                "message": "The value 'forever' of the header 'timeout' is not a valid duration.",
                "description": "Verify that the value of the header 'timeout' is correct and try again."
            })
        );
    }

    #[test]
    fn internal_headers_are_added_after_translation() {
        let translator = HeaderTranslator::ditto();
        let external = translator
            .from_external_headers([("correlation-id", "req-2")])
            .unwrap();

        let internal = external
            .to_builder()
            .authorization_context(&context_with_subjects(1))
            .sudo(false)
            .build();

        assert_eq!(internal.authorization_context().len(), 1);

        let outgoing = translator.to_external_headers(&internal);
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing.get("correlation-id"), Some("req-2"));
    }
}

mod limits {
    use super::*;

    #[test]
    fn headers_over_byte_limit_fail_and_can_be_truncated() {
        let headers = DittoHeaders::builder()
            .correlation_id("c-1")
            .unwrap()
            .put_header("x-huge", "x".repeat(6000))
            .unwrap()
            .build();
        let config = HeadersConfig::default();

        let err = headers.check_limits(&config).unwrap_err();
        assert_eq!(err.status(), 431);
        assert!(matches!(err, HeaderError::TooLarge { max: 5000, .. }));

        let truncated = headers.truncate(config.max_bytes);
        assert!(truncated.check_limits(&config).is_ok());
        assert_eq!(truncated.correlation_id(), Some("c-1"));
    }

    #[test]
    fn too_many_subjects_are_rejected() {
        let config = HeadersConfig {
            max_bytes: 100_000,
            max_auth_subjects: 5,
        };
        let headers = DittoHeaders::builder()
            .authorization_context(&context_with_subjects(6))
            .build();

        let err = headers.check_limits(&config).unwrap_err();
        assert_eq!(err, HeaderError::TooManyAuthSubjects { count: 6, max: 5 });
        assert_eq!(err.to_string(), "The headers are too large.");
    }
}

mod json_codec {
    use super::*;

    #[test]
    fn typed_json_survives_serde() {
        let headers = DittoHeaders::builder()
            .correlation_id("json-1")
            .unwrap()
            .response_required(true)
            .etag(&EntityTag::from_revision(4))
            .journal_tags(&["tag-a", "tag-b"])
            .build();

        let text = serde_json::to_string(&headers).unwrap();
        let back: DittoHeaders = serde_json::from_str(&text).unwrap();

        assert_eq!(back, headers);
        assert_eq!(back.journal_tags(), vec!["tag-a", "tag-b"]);
        assert_eq!(back.etag(), Some(EntityTag::from_revision(4)));
    }

    #[test]
    fn every_definition_renders_with_its_serialization_type() {
        for definition in DittoHeaderDefinition::all() {
            let json_type = definition.serialization_type();
            assert_eq!(json_type, definition.value_type().serialization_type());
        }
    }
}

mod conditional_requests {
    use super::*;

    #[test]
    fn stale_if_match_fails_write() {
        let headers = DittoHeaders::from_map([("If-Match", r#""rev:1""#)]).unwrap();
        let current = EntityTag::from_revision(2);

        let err = check_preconditions(&headers, Some(&current), RequestKind::Write).unwrap_err();
        assert_eq!(err.status(), 412);
        assert_eq!(err.to_json()["status"], 412);
    }

    #[test]
    fn matching_if_none_match_on_read_is_not_modified() {
        let headers = DittoHeaders::from_map([("If-None-Match", r#""rev:2""#)]).unwrap();
        let current = EntityTag::from_revision(2);

        let err = check_preconditions(&headers, Some(&current), RequestKind::Read).unwrap_err();
        assert_eq!(err.status(), 304);
    }
}
