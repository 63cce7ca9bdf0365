//! HTTP handlers for the identity verifier

use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use photure_common::api::types::{ErrorBody, ServiceHealth, VerifyResponse};
use thiserror::Error;
use tracing::warn;

/// Verifier error type
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed, or unknown credential (401)
    #[error("{0}")]
    Unauthorized(String),

    /// No token table configured; every request fails closed (500)
    #[error("Authentication not configured")]
    NotConfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AuthError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "NOT_CONFIGURED",
                "Authentication not configured".to_string(),
            ),
        };
        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(ServiceHealth::ok(
        "auth-service",
        format!("Environment: {}", state.environment),
    ))
}

/// POST /verify
///
/// Resolves the `Authorization` bearer header to a verified identity.
/// Rejections carry 401 so the gateway can propagate them verbatim.
pub async fn verify_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, AuthError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AuthError::Unauthorized("Missing Authorization header".to_string()))?;

    if state.tokens.is_empty() {
        return Err(AuthError::NotConfigured);
    }

    let token = authorization
        .strip_prefix("Bearer ")
        .unwrap_or(authorization)
        .trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized(
            "Invalid Authorization header".to_string(),
        ));
    }

    match state.tokens.get(token) {
        Some(user_id) => Ok(Json(VerifyResponse {
            user_id: user_id.clone(),
            session_id: None,
        })),
        None => {
            warn!("Rejected unknown token");
            Err(AuthError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        }
    }
}
