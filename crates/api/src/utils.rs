use axum::http::HeaderMap;

use crate::error::ApiError;

/// Header set by the edge proxy with the ISO country of the client address.
pub const COUNTRY_CODE_HEADER: &str = "X-Country-Code";

/// Reduces a reported device id to `[A-Za-z0-9._-]`.
///
/// Ids with nothing left after filtering are rejected.
pub fn sanitize_device_id(device_id: &str) -> Result<String, ApiError> {
    let sanitized: String = device_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if sanitized.is_empty() {
        return Err(ApiError::InvalidDeviceId(device_id.to_string()));
    }
    Ok(sanitized)
}

/// Country code from the proxy header, if present and non-blank.
pub fn country_code(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COUNTRY_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
