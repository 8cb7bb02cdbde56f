use axum::{extract::State, response::Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::imaging;
use crate::models::SessionId;
use crate::server::AppState;
use crate::services::{media_store, SessionStore};

/// JPEG quality for archived images
const ARCHIVE_JPEG_QUALITY: u8 = 80;

/// Request body for archiving a final image
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveImageRequest {
    /// Base64 image data URL (data:image/...;base64,...)
    pub image: String,
    /// Participant identifier used to name the archived file
    pub session_id: String,
}

/// Response after archiving
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveImageResponse {
    pub success: bool,
    /// Name of the archived file in the media store
    pub public_id: String,
    /// Hosted URL of the archived file, when the store returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Archive a participant's final image to the media store
///
/// The image is re-encoded as JPEG before upload and stored under
/// `{session_id}_{timestamp}` for later per-participant collection.
#[utoipa::path(
    post,
    path = "/save-final-image",
    request_body = SaveImageRequest,
    responses(
        (status = 200, description = "Image archived", body = SaveImageResponse),
        (status = 400, description = "Missing field or invalid data URL"),
    ),
    tag = "Archive"
)]
pub async fn handle_save_final_image(
    State(state): State<AppState>,
    Json(request): Json<SaveImageRequest>,
) -> Result<Json<SaveImageResponse>, ApiError> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::MissingField("session_id"));
    }
    if request.image.is_empty() {
        return Err(ApiError::MissingField("image"));
    }

    let jpeg = imaging::data_url_to_jpeg(
        &request.image,
        ARCHIVE_JPEG_QUALITY,
        state.config.limits.max_image_bytes,
    )?;
    let file = format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg));

    let public_id = media_store::public_id_for(&request.session_id, chrono::Utc::now());

    tracing::info!(
        session_id = %request.session_id,
        public_id = %public_id,
        jpeg_bytes = jpeg.len(),
        "Archiving final image"
    );

    let receipt = state.media_store.upload(&file, &public_id).await?;

    // The archive is the last touch a participant makes; keep their record warm
    state
        .sessions
        .upsert(SessionId::new(request.session_id))
        .await?;

    Ok(Json(SaveImageResponse {
        success: true,
        public_id: receipt.public_id,
        url: receipt.secure_url,
    }))
}
