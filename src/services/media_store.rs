//! Signed uploads to the cloud media store used for archiving final images.
//!
//! Uploads are authenticated by hashing the sorted request parameters together
//! with the account secret (the store's SHA-256 signature scheme). Archived
//! files are named `{session_id}_{YYYYMMDD_HHMMSS}` so the archive can be
//! grouped by participant and ordered by time afterwards.

use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::ApiError;
use crate::models::MediaStoreConfig;
use crate::services::provider_error;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub struct MediaStoreClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_secret: Option<String>,
}

/// Provider acknowledgement of a stored image
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub public_id: String,
    pub secure_url: Option<String>,
}

impl MediaStoreClient {
    pub fn new(
        config: &MediaStoreConfig,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        if base_url.is_empty() {
            tracing::warn!("Media store base URL not configured, archiving will fail");
        }

        Ok(Self {
            client,
            base_url,
            api_key,
            api_secret,
        })
    }

    /// Upload a base64 image data URL under the given public id.
    pub async fn upload(&self, data_url: &str, public_id: &str) -> Result<UploadReceipt, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Internal("media store API key not configured".to_string()))?;

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(public_id, timestamp)?;

        let form = Form::new()
            .text("file", data_url.to_string())
            .text("api_key", api_key.to_string())
            .text("timestamp", timestamp.to_string())
            .text("public_id", public_id.to_string())
            .text("signature", signature);

        let url = format!("{}/image/upload", self.base_url);
        tracing::debug!(url = %url, public_id = public_id, "Archive upload");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))
    }

    /// Compute the upload signature: sha256 over the signed parameters in
    /// alphabetical order, with the secret appended.
    fn sign(&self, public_id: &str, timestamp: i64) -> Result<String, ApiError> {
        let secret = self.api_secret.as_deref().ok_or_else(|| {
            ApiError::Internal("media store API secret not configured".to_string())
        })?;

        let mut hasher = Sha256::new();
        hasher.update(format!("public_id={public_id}&timestamp={timestamp}"));
        hasher.update(secret);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Build the archive name for a participant's final image.
pub fn public_id_for(session_id: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    format!("{}_{}", session_id, now.format("%Y%m%d_%H%M%S"))
}
