//! Header translation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{ditto_headers_from_request, response_headers};

/// POST /headers: returns the Ditto headers the request translates to.
///
/// The body is the JSON form of the headers; headers that may be written to
/// external recipients are echoed as response headers.
#[tracing::instrument(skip_all)]
pub async fn translate(
    State(state): State<Arc<AppState>>,
    request_headers: HeaderMap,
) -> Result<(HeaderMap, Json<Value>), ApiError> {
    let headers = ditto_headers_from_request(&state, &request_headers)?;
    tracing::debug!(
        correlation_id = headers.correlation_id(),
        count = headers.len(),
        "translated request headers"
    );
    metrics::counter!("gateway_headers_translated_total").increment(1);

    Ok((response_headers(&state, &headers), Json(headers.to_json())))
}
