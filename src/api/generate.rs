use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::clamp_prompt;
use crate::error::ApiError;
use crate::server::AppState;

/// Request body for image generation
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Text prompt describing the image
    pub prompt: String,
    /// Provider style tag (default: realistic_image)
    pub style: Option<String>,
    /// Output size as WIDTHxHEIGHT (default: 1024x1024)
    pub size: Option<String>,
}

/// Response for a generated image
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub success: bool,
    /// Provider-hosted URL of the generated image
    pub image_url: String,
}

/// Generate an image from a text prompt
///
/// The prompt is relayed to the generative provider; the response carries the
/// provider-hosted image URL rather than the image bytes.
#[utoipa::path(
    post,
    path = "/generate-image",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Image generated", body = GenerateResponse),
        (status = 400, description = "Missing or empty prompt"),
    ),
    tag = "Generation"
)]
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = clamp_prompt(&request.prompt, state.config.limits.max_prompt_chars);
    if prompt.is_empty() {
        return Err(ApiError::MissingField("prompt"));
    }

    let style = request
        .style
        .as_deref()
        .unwrap_or(&state.config.generative.default_style);
    let size = request
        .size
        .as_deref()
        .unwrap_or(&state.config.generative.default_size);

    tracing::info!(
        prompt_len = prompt.len(),
        style = style,
        size = size,
        "Generation request received"
    );

    let image_url = state.generative.generate(&prompt, style, size).await?;

    tracing::info!(image_url = %image_url, "Image generated");

    Ok(Json(GenerateResponse {
        success: true,
        image_url,
    }))
}
