//! Client for the generative image provider (OpenAI-compatible API).
//!
//! Covers text-to-image generation and mask-based inpainting. The provider
//! hosts results itself and answers with a URL; callers that need bytes use
//! [`GenerativeClient::fetch_image`].

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::GenerativeConfig;
use crate::services::provider_error;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GenerativeClient {
    client: Client,
    fetch_client: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// Image bytes fetched from a provider-hosted URL
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl GenerativeClient {
    pub fn new(config: &GenerativeConfig, api_token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(PROVIDER_TIMEOUT).build()?;
        let fetch_client = Client::builder().timeout(FETCH_TIMEOUT).build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!(
            base_url = %base_url,
            model = %config.model,
            has_token = api_token.is_some(),
            "Generative client configured"
        );

        Ok(Self {
            client,
            fetch_client,
            base_url,
            model: config.model.clone(),
            api_token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Generate an image from a text prompt; returns the hosted result URL.
    pub async fn generate(&self, prompt: &str, style: &str, size: &str) -> Result<String, ApiError> {
        let url = format!("{}/v1/images/generations", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "style": style,
            "size": size,
            "n": 1,
        });

        tracing::debug!(url = %url, style = style, size = size, "Generation request");

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
        Self::first_url(parsed)
    }

    /// Replace the masked region of an image according to the prompt; returns
    /// the hosted result URL.
    pub async fn inpaint(
        &self,
        image_png: Vec<u8>,
        mask_png: Vec<u8>,
        prompt: &str,
        style: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/v1/images/inpaint", self.base_url);

        let form = Form::new()
            .part(
                "image",
                Part::bytes(image_png)
                    .file_name("image.png")
                    .mime_str("image/png")
                    .map_err(|e| ApiError::Internal(e.to_string()))?,
            )
            .part(
                "mask",
                Part::bytes(mask_png)
                    .file_name("mask.png")
                    .mime_str("image/png")
                    .map_err(|e| ApiError::Internal(e.to_string()))?,
            )
            .text("prompt", prompt.to_string())
            .text("model", self.model.clone())
            .text("style", style.to_string())
            .text("n", "1")
            .text("response_format", "url");

        tracing::debug!(url = %url, style = style, "Inpaint request");

        let response = self
            .authorize(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
        Self::first_url(parsed)
    }

    /// Download an image from a remote URL (provider-hosted result or a
    /// client-supplied source image).
    pub async fn fetch_image(&self, url: &str) -> Result<FetchedImage, ApiError> {
        let response = self
            .fetch_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ApiError::Upstream(format!(
                "image fetch returned {status} for {url}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    fn first_url(parsed: ImageResponse) -> Result<String, ApiError> {
        parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| ApiError::Upstream("no image URL in provider response".to_string()))
    }
}
