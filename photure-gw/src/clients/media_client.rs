//! Media store HTTP client

use super::{LeafError, LeafResult, MediaStore};
use async_trait::async_trait;
use bytes::Bytes;
use photure_common::api::types::MediaUploadResponse;
use reqwest::multipart::{Form, Part};

/// HTTP client for the media store service
pub struct MediaClient {
    http: reqwest::Client,
    base_url: String,
}

impl MediaClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaStore for MediaClient {
    async fn upload(
        &self,
        data: Bytes,
        content_type: &str,
        filename: &str,
    ) -> LeafResult<MediaUploadResponse> {
        let url = format!("{}/media/upload", self.base_url);

        let part = Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| LeafError::Rejected {
                status: 400,
                message: format!("Invalid content type {}: {}", content_type, e),
            })?;
        let form = Form::new().part("file", part);

        tracing::debug!(url = %url, filename = %filename, "Uploading media");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| LeafError::invalid_response("media-service", e))
    }

    async fn fetch(
        &self,
        storage_key: &str,
        download_name: &str,
        content_type: &str,
    ) -> LeafResult<Bytes> {
        let url = format!("{}/media/{}", self.base_url, storage_key);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("download_name", download_name),
                ("content_type", content_type),
            ])
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        response
            .bytes()
            .await
            .map_err(|e| LeafError::invalid_response("media-service", e))
    }

    async fn delete(&self, storage_key: &str) -> LeafResult<()> {
        let url = format!("{}/media/{}", self.base_url, storage_key);

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(LeafError::from_request)?;

        if !response.status().is_success() {
            return Err(LeafError::from_response(response).await);
        }

        Ok(())
    }
}
