//! API Response types
//!
//! The backend wraps most payloads in an envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "OK",
//!     "data": { ... }
//! }
//! ```
//! A few list endpoints return the bare payload instead.

use serde::{Deserialize, Serialize};

/// Response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Either an envelope or a bare payload
///
/// The envelope variant is tried first; it requires `success`, so bare
/// objects without that field fall through to [`ApiPayload::Bare`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiPayload<T> {
    Envelope(ApiResponse<T>),
    Bare(T),
}

impl<T> ApiPayload<T> {
    /// Unwrap the payload. `Err` carries the server message of a failed envelope.
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self {
            ApiPayload::Envelope(resp) if resp.success => Ok(resp.data),
            ApiPayload::Envelope(resp) => Err(resp
                .message
                .unwrap_or_else(|| "Unknown error".to_string())),
            ApiPayload::Bare(data) => Ok(Some(data)),
        }
    }
}
