//! Thing event endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use serde_json::Value;
use signals::{Event, EventEnvelope, ThingEvent};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{ditto_headers_from_request, response_headers};

/// POST /things/{thingId}/events: reads a thing event with the request's
/// headers and returns its normalised JSON.
///
/// The body's `thingId` may be omitted; if present it must equal the path.
#[tracing::instrument(skip(state, request_headers, body))]
pub async fn publish(
    State(state): State<Arc<AppState>>,
    Path(thing_id): Path<String>,
    request_headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<(HeaderMap, Json<Value>), ApiError> {
    let headers = ditto_headers_from_request(&state, &request_headers)?;

    let object = body
        .as_object_mut()
        .ok_or_else(|| ApiError::bad_request("json.invalid", "The event must be a JSON object."))?;
    match object.get(ThingEvent::ENTITY_ID_FIELD) {
        Some(Value::String(id)) if *id == thing_id => {}
        Some(other) => {
            let id = other.as_str().map_or_else(|| other.to_string(), str::to_owned);
            return Err(ApiError::bad_request(
                "things.id.mismatch",
                format!("The thing ID <{id}> of the event does not match <{thing_id}> of the path."),
            ));
        }
        None => {
            object.insert(
                ThingEvent::ENTITY_ID_FIELD.to_string(),
                Value::String(thing_id),
            );
        }
    }

    let envelope = EventEnvelope::<ThingEvent>::from_json(&body, headers)?;
    tracing::info!(
        event_type = envelope.event_type(),
        thing_id = %envelope.entity_id(),
        revision = %envelope.revision(),
        "received thing event"
    );
    metrics::counter!("gateway_events_total", "type" => envelope.event_type()).increment(1);

    let mut response = response_headers(&state, envelope.headers());
    if let Ok(etag) = HeaderValue::from_str(&envelope.etag().to_string()) {
        response.insert(header::ETAG, etag);
    }

    Ok((response, Json(envelope.to_json()?)))
}
