//! Gateway error taxonomy
//!
//! Every orchestrated operation resolves to either a success value or one
//! of these variants. The compensation logic depends on upstream failures
//! being typed outcomes rather than caught exceptions: "terminal, nothing
//! to compensate" and "terminal, compensation required" are decided by
//! which call produced the error, and the variant records what the caller
//! should see.
//!
//! Upstream statuses are propagated verbatim except where doing so would
//! leak a distinction the contract forbids (a record that exists but is
//! owned by someone else surfaces as the same 404 as one that never
//! existed).

use crate::clients::LeafError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photure_common::api::types::ErrorBody;
use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or invalid credential (401)
    #[error("{0}")]
    Authentication(String),

    /// Absent or owned-by-another, surfaced uniformly (404, never 403)
    #[error("{0}")]
    NotFound(String),

    /// Bad content type or pagination bounds, rejected locally (400)
    #[error("{0}")]
    Validation(String),

    /// Upload payload over the size limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A leaf service could not be reached (503)
    #[error("{service} unavailable")]
    UpstreamUnavailable { service: &'static str },

    /// A leaf service answered with a non-success status; propagated
    /// with its original status and message
    #[error("{message}")]
    UpstreamRejected { status: u16, message: String },

    /// A live record's blob could not be served (500); the id and key
    /// are logged for operator follow-up before this is constructed
    #[error("Stored media unavailable for photo {photo_id}")]
    Inconsistent { photo_id: String },

    /// Gateway-side failure outside the taxonomy above (500)
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Map a leaf client failure onto the taxonomy: unreachable becomes
    /// service-unavailable, a rejection propagates status and message
    pub fn from_leaf(service: &'static str, err: LeafError) -> Self {
        match err {
            LeafError::Unreachable(_) => GatewayError::UpstreamUnavailable { service },
            LeafError::Rejected { status, message } => {
                GatewayError::UpstreamRejected { status, message }
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            GatewayError::Authentication(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            GatewayError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            GatewayError::Validation(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            GatewayError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
            GatewayError::UpstreamUnavailable { service } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                format!("{} unavailable", service),
            ),
            GatewayError::UpstreamRejected { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_ERROR",
                message,
            ),
            GatewayError::Inconsistent { photo_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("Stored media unavailable for photo {}", photo_id),
            ),
            GatewayError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
