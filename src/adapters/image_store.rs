use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

/// Upload and delete failures are indistinguishable to callers; the store is
/// an opaque collaborator and no retry is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("image store request failed")]
pub struct StoreError;

/// A successfully stored image. The URL always has the shape
/// `<cdn_domain>/<id>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    client: Client,
    upload_url: String,
    api_key: String,
    cdn_domain: String,
}

impl ImageStore {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("failed to build image store HTTP client");

        Self {
            client,
            upload_url: config.image_store_url.clone(),
            api_key: config.image_store_key.clone(),
            cdn_domain: config.cdn_domain.trim_end_matches('/').to_string(),
        }
    }

    /// Uploads a staged local file. The store reads from the file handle the
    /// pipeline wrote; the staged file itself is cleaned up by the caller's
    /// scope.
    pub async fn upload_file(&self, path: &Path, filename: &str) -> Result<StoredImage, StoreError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(error = %e, "failed to read staged image file");
            StoreError
        })?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let uploaded: UploadResponse = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(error = %e, "image upload failed");
                StoreError
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "image upload response was not parseable");
                StoreError
            })?;

        let url = format!("{}/{}/", self.cdn_domain, uploaded.id);
        Ok(StoredImage {
            id: uploaded.id,
            url,
        })
    }

    /// Deletes a previously stored image, keyed by the id parsed out of its
    /// URL.
    pub async fn delete(&self, url: &str) -> Result<(), StoreError> {
        let id = file_id_from_url(url).ok_or_else(|| {
            tracing::warn!(url, "image URL has no id segment");
            StoreError
        })?;

        self.client
            .delete(format!("{}/{}", self.upload_url.trim_end_matches('/'), id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(error = %e, "image delete failed");
                StoreError
            })?;

        Ok(())
    }
}

/// The id is the trailing path segment of the stored URL.
fn file_id_from_url(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}
