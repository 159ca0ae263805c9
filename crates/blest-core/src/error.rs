//! Error types for BLEST.
//!
//! This module provides [`BlestError`], the error type raised by user-supplied
//! stages and synthesized by the dispatch engine, and [`ErrorObject`], the
//! structurally uniform envelope every error is converted to before it reaches
//! the caller.
//!
//! Batch-level validation failures abort the whole call; per-item errors are
//! isolated to their response envelope. Both surfaces use the same envelope
//! shape: `{message, status, code?, data?, stack?}`.

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::backtrace::{Backtrace, BacktraceStatus};
use thiserror::Error;

/// Result type alias using [`BlestError`].
pub type BlestResult<T> = Result<T, BlestError>;

/// Standard error type for BLEST stage execution and batch validation.
///
/// User code raises errors with the [`BlestError::stage`] constructor and the
/// `with_*` builders; the remaining variants are synthesized by the engine.
///
/// # Example
///
/// ```
/// use blest_core::BlestError;
/// use http::StatusCode;
///
/// let err = BlestError::stage("Insufficient funds")
///     .with_status(StatusCode::PAYMENT_REQUIRED)
///     .with_code("INSUFFICIENT_FUNDS");
/// assert_eq!(err.status(), StatusCode::PAYMENT_REQUIRED);
/// ```
#[derive(Error, Debug, Clone)]
pub enum BlestError {
    /// The batch itself was malformed. Aborts the whole call.
    #[error("{message}")]
    BadRequest {
        /// The specific validation reason, surfaced verbatim to clients.
        message: String,
    },

    /// The requested route is not registered. Synthesized per item.
    #[error("Route not found")]
    RouteNotFound,

    /// The route exceeded its declared timeout.
    #[error("Internal Server Error")]
    Timeout,

    /// The handler returned a value that is not a JSON object.
    #[error("Internal Server Error")]
    ResultShape,

    /// An error raised by user-supplied middleware, handler, or afterware.
    #[error("{message}")]
    Stage {
        /// Human-readable error message.
        message: String,
        /// HTTP-style status carried to the response envelope.
        status: StatusCode,
        /// Optional machine-readable code.
        code: Option<Value>,
        /// Optional structured payload.
        data: Option<Value>,
        /// Backtrace lines captured at construction, if enabled.
        stack: Option<Vec<String>>,
    },
}

impl BlestError {
    /// Creates a batch-level validation error with the given reason.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a stage error with status 500.
    ///
    /// A backtrace is captured when the process has backtraces enabled
    /// (`RUST_BACKTRACE`); whether it is surfaced is decided at dispatch
    /// time by the engine's options.
    #[must_use]
    pub fn stage(message: impl Into<String>) -> Self {
        Self::Stage {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            data: None,
            stack: capture_stack(),
        }
    }

    /// Sets the status of a stage error. No-op for engine-synthesized
    /// variants, whose statuses are fixed by the protocol.
    #[must_use]
    pub fn with_status(mut self, new_status: StatusCode) -> Self {
        if let Self::Stage { ref mut status, .. } = self {
            *status = new_status;
        }
        self
    }

    /// Attaches a machine-readable code to a stage error.
    #[must_use]
    pub fn with_code(mut self, new_code: impl Into<Value>) -> Self {
        if let Self::Stage { ref mut code, .. } = self {
            *code = Some(new_code.into());
        }
        self
    }

    /// Attaches a structured data payload to a stage error.
    #[must_use]
    pub fn with_data(mut self, new_data: impl Into<Value>) -> Self {
        if let Self::Stage { ref mut data, .. } = self {
            *data = Some(new_data.into());
        }
        self
    }

    /// Returns the status carried to the response envelope.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Timeout | Self::ResultShape => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Stage { status, .. } => *status,
        }
    }

    /// Converts this error to the uniform wire envelope.
    ///
    /// `include_stack` gates the `stack` field; production deployments leave
    /// it off.
    #[must_use]
    pub fn to_object(&self, include_stack: bool) -> ErrorObject {
        let mut object = ErrorObject::new(self.status().as_u16(), self.to_string());
        if let Self::Stage {
            code, data, stack, ..
        } = self
        {
            object.code = code.clone();
            object.data = data.clone();
            if include_stack {
                object.stack = stack.clone();
            }
        }
        object
    }
}

impl From<anyhow::Error> for BlestError {
    /// Wraps an arbitrary error as a stage error with status 500, so handler
    /// code can propagate third-party failures with `?`.
    fn from(source: anyhow::Error) -> Self {
        Self::stage(source.to_string())
    }
}

/// Captures the current backtrace as display lines, honoring
/// `RUST_BACKTRACE`. Returns `None` when backtraces are disabled.
fn capture_stack() -> Option<Vec<String>> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(
            backtrace
                .to_string()
                .lines()
                .map(|line| line.trim().to_owned())
                .collect(),
        ),
        _ => None,
    }
}

/// The uniform wire-level error envelope.
///
/// Every error surfaced to the caller has this shape regardless of origin:
/// batch validation, route not found, stage failure, result shape, timeout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    /// Human-readable error message.
    pub message: String,
    /// HTTP-style status code.
    pub status: u16,
    /// Machine-readable code, if the error carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    /// Structured payload, if the error carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Backtrace lines, attached only in non-production configurations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

impl ErrorObject {
    /// Creates an envelope with just a status and a message.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: None,
            data: None,
            stack: None,
        }
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_error_defaults_to_500() {
        let err = BlestError::stage("boom");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_stage_error_builders() {
        let err = BlestError::stage("no such user")
            .with_status(StatusCode::NOT_FOUND)
            .with_code("USER_NOT_FOUND")
            .with_data(json!({ "user_id": "u-1" }));

        let object = err.to_object(false);
        assert_eq!(object.status, 404);
        assert_eq!(object.message, "no such user");
        assert_eq!(object.code, Some(json!("USER_NOT_FOUND")));
        assert_eq!(object.data, Some(json!({ "user_id": "u-1" })));
        assert_eq!(object.stack, None);
    }

    #[test]
    fn test_synthesized_statuses_are_fixed() {
        assert_eq!(BlestError::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            BlestError::Timeout.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BlestError::ResultShape.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // with_status must not rewrite a protocol-fixed status
        let err = BlestError::RouteNotFound.with_status(StatusCode::IM_A_TEAPOT);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_route_not_found_envelope_carries_no_code_or_data() {
        let object = BlestError::RouteNotFound.to_object(true);
        assert_eq!(object.message, "Route not found");
        assert_eq!(object.status, 404);
        assert_eq!(object.code, None);
        assert_eq!(object.data, None);
    }

    #[test]
    fn test_envelope_serialization_skips_absent_fields() {
        let object = ErrorObject::new(400, "Request items should have unique IDs");
        let json = serde_json::to_value(&object).expect("serialization should work");
        assert_eq!(
            json,
            json!({ "message": "Request items should have unique IDs", "status": 400 })
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let source = anyhow::anyhow!("connection refused");
        let err: BlestError = source.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "connection refused");
    }
}
