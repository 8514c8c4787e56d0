pub mod events;
pub mod headers;
pub mod health;
pub mod metrics;

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use ditto_headers::{CaseInsensitiveHeaders, DittoHeaders};

use crate::AppState;
use crate::error::ApiError;

/// Transport headers that describe the HTTP exchange, not the signal.
const TRANSPORT_HEADERS: [HeaderName; 5] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::ACCEPT_ENCODING,
];

/// Request headers never written back to the client.
const NOT_ECHOED_HEADERS: [HeaderName; 11] = [
    header::AUTHORIZATION,
    header::PROXY_AUTHORIZATION,
    header::COOKIE,
    header::USER_AGENT,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
    header::ORIGIN,
    header::REFERER,
    // The response body sets its own content type.
    header::CONTENT_TYPE,
    header::EXPECT,
    header::UPGRADE,
];

/// Reads the Ditto headers of a request.
///
/// Repeated header lines are joined with `,`. Adds a random correlation id when none was sent, rejects timeouts above
/// the configured maximum and enforces the header limits.
pub(crate) fn ditto_headers_from_request(
    state: &AppState,
    request_headers: &HeaderMap,
) -> Result<DittoHeaders, ApiError> {
    let mut external = Vec::with_capacity(request_headers.keys_len());
    for name in request_headers.keys() {
        if TRANSPORT_HEADERS.contains(name) {
            continue;
        }
        let values = request_headers
            .get_all(name)
            .iter()
            .map(|value| {
                value.to_str().map_err(|_| {
                    ApiError::bad_request(
                        "header.invalid",
                        format!("The value of the header '{name}' is not visible ASCII."),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        external.push((name.as_str(), values.join(",")));
    }

    let mut headers = state.translator.from_external_headers(external)?;
    if headers.correlation_id().is_none() {
        headers = headers.to_builder().random_correlation_id().build();
    }

    if let Some(timeout) = headers.timeout() {
        let max = state.config.max_timeout;
        if timeout.as_duration() > max.as_duration() {
            return Err(ApiError::TimeoutInvalid { timeout, max });
        }
    }

    headers.check_limits(&state.config.headers)?;
    Ok(headers)
}

/// Converts the headers that may be written to external recipients into
/// response headers.
pub(crate) fn response_headers(state: &AppState, headers: &DittoHeaders) -> HeaderMap {
    external_header_map(&state.translator.to_external_headers(headers))
}

fn external_header_map(headers: &CaseInsensitiveHeaders) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers.iter() {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), _)
                if NOT_ECHOED_HEADERS.contains(&name) || TRANSPORT_HEADERS.contains(&name) => {}
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::debug!(header = key, "skipping header not representable in HTTP"),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_not_echoed() {
        let mut headers = CaseInsensitiveHeaders::new();
        headers.insert("Authorization", "Bearer token");
        headers.insert("cookie", "session=abc");
        headers.insert("Content-Type", "text/plain");
        headers.insert("correlation-id", "abc");

        let map = external_header_map(&headers);
        assert_eq!(map.len(), 1);
        assert_eq!(map["correlation-id"], "abc");
    }
}
