//! Gallery catalog HTTP client
//!
//! The verified owner travels to the catalog in the `X-User-Id` header;
//! the catalog scopes every operation to it.

use super::{GalleryCatalog, LeafError, LeafResult};
use async_trait::async_trait;
use photure_common::api::types::{
    CreatePhotoRequest, DeletePhotoResult, PhotoRecord, PhotoRecordPage,
};

const USER_HEADER: &str = "X-User-Id";

/// HTTP client for the gallery catalog service
pub struct GalleryClient {
    http: reqwest::Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GalleryCatalog for GalleryClient {
    async fn create(&self, request: &CreatePhotoRequest) -> LeafResult<PhotoRecord> {
        let url = format!("{}/gallery/photos", self.base_url);
        tracing::debug!(url = %url, user_id = %request.user_id, "Creating photo record");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("gallery-service", e))
    }

    async fn list(&self, owner: &str, skip: i64, limit: i64) -> LeafResult<PhotoRecordPage> {
        let url = format!("{}/gallery/photos", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(USER_HEADER, owner)
            .query(&[("skip", skip.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("gallery-service", e))
    }

    async fn get(&self, photo_id: &str, owner: &str) -> LeafResult<PhotoRecord> {
        let url = format!("{}/gallery/photos/{}", self.base_url, photo_id);

        let response = self
            .http
            .get(&url)
            .header(USER_HEADER, owner)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("gallery-service", e))
    }

    async fn delete(&self, photo_id: &str, owner: &str) -> LeafResult<DeletePhotoResult> {
        let url = format!("{}/gallery/photos/{}", self.base_url, photo_id);

        let response = self
            .http
            .delete(&url)
            .header(USER_HEADER, owner)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("gallery-service", e))
    }
}
