//! Client for the editing provider (cleanup, background replacement,
//! reimagining). Unlike the generative provider, these endpoints answer with
//! the edited image bytes directly.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::EditingConfig;
use crate::services::provider_error;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

pub struct EditingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Result bytes relayed from the editing provider
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl EditingClient {
    pub fn new(config: &EditingConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            has_key = api_key.is_some(),
            "Editing client configured"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Remove the masked region and fill it from the surroundings.
    pub async fn cleanup(&self, image: Vec<u8>, mask: Vec<u8>) -> Result<EditedImage, ApiError> {
        let form = Form::new()
            .part("image_file", png_part(image, "image.png")?)
            .part("mask_file", png_part(mask, "mask.png")?);
        self.post("/cleanup/v1", form).await
    }

    /// Replace the background with one generated from the prompt.
    pub async fn replace_background(
        &self,
        image: Vec<u8>,
        prompt: &str,
    ) -> Result<EditedImage, ApiError> {
        let form = Form::new()
            .part("image_file", png_part(image, "image.png")?)
            .text("prompt", prompt.to_string());
        self.post("/replace-background/v1", form).await
    }

    /// Generate a variation of the whole image.
    pub async fn reimagine(&self, image: Vec<u8>) -> Result<EditedImage, ApiError> {
        let form = Form::new().part("image_file", png_part(image, "image.png")?);
        self.post("/reimagine/v1/reimagine", form).await
    }

    async fn post(&self, path: &str, form: Form) -> Result<EditedImage, ApiError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "Editing request");

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        Ok(EditedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn png_part(bytes: Vec<u8>, file_name: &str) -> Result<Part, ApiError> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .map_err(|e| ApiError::Internal(e.to_string()))
}
