// crates/peticoes-api/src/error.rs
// ============================================================================
// Module: API Error Mapping
// Description: HTTP error type and status mapping for all handlers.
// Purpose: Serialize failures as {"error": message} with stable statuses.
// Dependencies: axum, peticoes-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every handler returns [`ApiError`] on failure. Ledger errors map 1:1 onto
//! HTTP statuses: `NotFound` 404, `Validation` 400, `Conflict` 409, and
//! everything else 500. Internal failures keep their detail out of the
//! response body; callers only see a generic message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use peticoes_core::LedgerError;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Caller-visible API failure.
///
/// # Invariants
/// - `Internal` detail never reaches the response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No resource matches the request.
    #[error("petition not found")]
    NotFound,
    /// The request payload or query failed validation.
    #[error("{0}")]
    Validation(String),
    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),
    /// An internal failure; detail stays server-side.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::NotFound => Self::NotFound,
            LedgerError::Validation(message) => Self::Validation(message),
            LedgerError::Conflict(message) => Self::Conflict(message),
            LedgerError::Store(message) => Self::Internal(message),
        }
    }
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal detail is kept out of response bodies.
        let message = match &self {
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
