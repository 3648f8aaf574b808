//! Structured error codes for user-facing failure reporting.
//!
//! DESIGN
//! ======
//! Every failure in the studio is caught at the boundary of the operation
//! that initiated it and converted to a transient notification; nothing is
//! fatal to the process. Each error enum implements [`ErrorCode`] so the
//! route layer can emit grepable codes alongside the human message.

use axum::Json;
use axum::http::StatusCode;
use serde_json::json;

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Build the JSON error body the host UI renders as a transient notice.
pub fn error_body<E: ErrorCode>(status: StatusCode, err: &E) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "code": err.error_code(),
            "retryable": err.retryable(),
        })),
    )
}
