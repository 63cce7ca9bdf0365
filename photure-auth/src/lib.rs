//! photure-auth library - Identity Verifier service
//!
//! Turns a bearer credential into a verified identity or a rejection.
//! Token issuance lives outside this system; this service only answers
//! "who is this credential?" against a token table configured at startup.

use axum::routing::{get, post};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// token -> user_id
    pub tokens: Arc<HashMap<String, String>>,
    /// Deployment environment name, shown in health responses
    pub environment: String,
}

impl AppState {
    /// Create new application state
    pub fn new(tokens: HashMap<String, String>, environment: impl Into<String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            environment: environment.into(),
        }
    }
}

/// Parse the `token=user_id,token=user_id` table from configuration
///
/// Malformed entries are skipped with a warning rather than refusing to
/// start; an empty result means every verify request will fail closed.
pub fn parse_token_table(raw: &str) -> HashMap<String, String> {
    let mut tokens = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((token, user_id)) if !token.is_empty() && !user_id.is_empty() => {
                tokens.insert(token.to_string(), user_id.to_string());
            }
            _ => {
                tracing::warn!(entry = %entry, "Skipping malformed token table entry");
            }
        }
    }
    tokens
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/verify", post(api::verify_token))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_table() {
        let tokens = parse_token_table("t1=u1,t2=u2");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.get("t1").map(String::as_str), Some("u1"));
        assert_eq!(tokens.get("t2").map(String::as_str), Some("u2"));
    }

    #[test]
    fn test_parse_token_table_skips_malformed_entries() {
        let tokens = parse_token_table("t1=u1,,broken,=u2,t3=");
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains_key("t1"));
    }

    #[test]
    fn test_parse_token_table_empty() {
        assert!(parse_token_table("").is_empty());
    }
}
