//! Identity verifier HTTP client

use super::{IdentityVerifier, LeafError, LeafResult};
use async_trait::async_trait;
use photure_common::api::types::VerifyResponse;
use reqwest::header::AUTHORIZATION;

/// HTTP client for the identity verifier service
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for AuthClient {
    async fn verify(&self, bearer: &str) -> LeafResult<VerifyResponse> {
        let url = format!("{}/verify", self.base_url);
        tracing::debug!(url = %url, "Verifying credential");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("auth-service", e))
    }
}
