//! Mock provider servers for integration tests.

use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use easel::models::{AppConfig, EditingConfig, GenerativeConfig, MediaStoreConfig};

/// One mock server per third-party dependency
pub struct MockProviders {
    pub generative: MockServer,
    pub editing: MockServer,
    pub media: MockServer,
}

impl MockProviders {
    pub async fn start() -> Self {
        Self {
            generative: MockServer::start().await,
            editing: MockServer::start().await,
            media: MockServer::start().await,
        }
    }

    /// App configuration pointing every provider at its mock
    pub fn config(&self) -> AppConfig {
        AppConfig {
            generative: GenerativeConfig {
                base_url: self.generative.uri(),
                ..Default::default()
            },
            editing: EditingConfig {
                base_url: self.editing.uri(),
            },
            media_store: MediaStoreConfig {
                base_url: self.media.uri(),
            },
            ..Default::default()
        }
    }

    /// URL of an image hosted on the generative mock
    pub fn hosted_url(&self, image_path: &str) -> String {
        format!("{}{image_path}", self.generative.uri())
    }

    /// Mock the generation endpoint to answer with a hosted result URL
    pub async fn mock_generation(&self, image_path: &str) {
        self.mock_generation_matching(image_path, serde_json::json!({})).await;
    }

    /// Mock the generation endpoint, matching only requests containing the
    /// given JSON fragment
    pub async fn mock_generation_matching(&self, image_path: &str, fragment: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(fragment))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"url": self.hosted_url(image_path)}]
            })))
            .mount(&self.generative)
            .await;
    }

    /// Mock the inpaint endpoint to answer with a hosted result URL
    pub async fn mock_inpaint(&self, image_path: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/images/inpaint"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"url": self.hosted_url(image_path)}]
            })))
            .mount(&self.generative)
            .await;
    }

    /// Host image bytes on the generative mock (provider-hosted results)
    pub async fn mock_hosted_image(&self, image_path: &str, bytes: Vec<u8>, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(image_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .insert_header("content-type", content_type),
            )
            .mount(&self.generative)
            .await;
    }

    /// Mock a generative endpoint returning a vendor error
    pub async fn mock_generative_error(&self, endpoint: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.generative)
            .await;
    }

    /// Mock an editing endpoint returning image bytes
    pub async fn mock_editing(&self, endpoint: &str, bytes: Vec<u8>) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("x-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.editing)
            .await;
    }

    /// Mock an editing endpoint returning a vendor error
    pub async fn mock_editing_error(&self, endpoint: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.editing)
            .await;
    }

    /// Mock the media store upload endpoint
    pub async fn mock_upload(&self, public_id: &str) {
        Mock::given(method("POST"))
            .and(path("/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": public_id,
                "secure_url": format!("{}/archive/{public_id}.jpg", self.media.uri()),
            })))
            .mount(&self.media)
            .await;
    }

    /// Mock the media store rejecting the upload
    pub async fn mock_upload_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/image/upload"))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.media)
            .await;
    }
}
