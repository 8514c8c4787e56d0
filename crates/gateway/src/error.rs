//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::DittoDuration;
use ditto_headers::HeaderError;
use serde_json::{Value, json};
use signals::SignalError;

/// API-level error rendered as `{"status", "error", "message", "description"}`.
#[derive(Debug)]
pub enum ApiError {
    /// Request headers were invalid or exceeded the limits.
    Headers(HeaderError),
    /// The event body could not be read.
    Signal(SignalError),
    /// The requested timeout is larger than the gateway allows.
    TimeoutInvalid {
        timeout: DittoDuration,
        max: DittoDuration,
    },
    /// Bad request from the client.
    BadRequest {
        error: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        let code = match self {
            ApiError::Headers(err) => err.status(),
            ApiError::Signal(err) => err.status(),
            ApiError::TimeoutInvalid { .. } | ApiError::BadRequest { .. } => 400,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Headers(err) => err.to_json(),
            ApiError::Signal(err) => err.to_json(),
            ApiError::TimeoutInvalid { timeout, max } => json!({
                "status": 400,
                "error": "timeout.invalid",
                "message": format!("The timeout <{timeout}> is not within the allowed time frame."),
                "description": format!("Timeout must be less than or equal to <{max}>."),
            }),
            ApiError::BadRequest { error, message } => json!({
                "status": 400,
                "error": error,
                "message": message,
                "description": "Check the request and try again.",
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        tracing::debug!(%status, error = %body["error"], "request rejected");
        metrics::counter!("gateway_errors_total", "status" => status.as_str().to_owned())
            .increment(1);
        (status, axum::Json(body)).into_response()
    }
}

impl From<HeaderError> for ApiError {
    fn from(err: HeaderError) -> Self {
        ApiError::Headers(err)
    }
}

impl From<SignalError> for ApiError {
    fn from(err: SignalError) -> Self {
        ApiError::Signal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_errors_keep_their_status() {
        let err = ApiError::from(HeaderError::TooManyAuthSubjects { count: 3, max: 1 });
        assert_eq!(err.status(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
        assert_eq!(err.body()["error"], "headers.too.large");
    }

    #[test]
    fn timeout_error_names_the_limit() {
        let err = ApiError::TimeoutInvalid {
            timeout: DittoDuration::from_secs(120),
            max: DittoDuration::from_secs(60),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body()["description"],
            "Timeout must be less than or equal to <60s>."
        );
    }
}
