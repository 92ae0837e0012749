//! ACS error response formatting
//!
//! ACS reports failures as `{"code": "404-object-not-found", "message": "..."}`
//! where the code is prefixed with the HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// ACS error code suffixes
pub mod codes {
    pub const BAD_REQUEST: &str = "bad-request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "object-not-found";
    pub const CONFLICT: &str = "http-event-collector-already-exists";
}

/// Build an ACS error response
///
/// The code is rendered as `<status>-<suffix>`, matching what ACS returns.
pub fn acs_error_response(status: StatusCode, suffix: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "code": format!("{}-{}", status.as_u16(), suffix),
            "message": message.into(),
        })),
    )
        .into_response()
}
