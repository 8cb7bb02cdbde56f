use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};

use crate::api::clamp_prompt;
use crate::error::ApiError;
use crate::imaging;
use crate::models::SessionId;
use crate::server::AppState;
use crate::services::SessionStore;

/// String tag selecting one of the four provider endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Replace the masked region according to the prompt (generative provider)
    Inpaint,
    /// Remove the masked region (editing provider)
    Cleanup,
    /// Replace the background according to the prompt (editing provider)
    ReplaceBg,
    /// Generate a variation of the whole image (editing provider)
    Reimagine,
}

impl EditMode {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "inpaint" => Some(EditMode::Inpaint),
            "cleanup" => Some(EditMode::Cleanup),
            "replacebg" => Some(EditMode::ReplaceBg),
            "reimagine" => Some(EditMode::Reimagine),
            _ => None,
        }
    }
}

/// A validated edit request carrying exactly the fields its mode requires
enum EditPlan {
    Inpaint {
        mask: Vec<u8>,
        prompt: String,
        style: Option<String>,
    },
    Cleanup {
        mask: Vec<u8>,
    },
    ReplaceBg {
        prompt: String,
    },
    Reimagine,
}

impl EditPlan {
    /// Check the form against the mode's requirements, returning the source
    /// image and the per-mode fields. Blank prompts count as missing.
    fn from_form(
        mode: EditMode,
        form: EditForm,
        max_prompt_chars: usize,
    ) -> Result<(Vec<u8>, Self), ApiError> {
        let image = form.image.ok_or(ApiError::MissingField("image"))?;
        let prompt = form
            .prompt
            .map(|p| clamp_prompt(&p, max_prompt_chars))
            .filter(|p| !p.is_empty());

        let plan = match mode {
            EditMode::Inpaint => EditPlan::Inpaint {
                mask: form.mask.ok_or(ApiError::MissingField("mask"))?,
                prompt: prompt.ok_or(ApiError::MissingField("prompt"))?,
                style: form.style,
            },
            EditMode::Cleanup => EditPlan::Cleanup {
                mask: form.mask.ok_or(ApiError::MissingField("mask"))?,
            },
            EditMode::ReplaceBg => EditPlan::ReplaceBg {
                prompt: prompt.ok_or(ApiError::MissingField("prompt"))?,
            },
            EditMode::Reimagine => EditPlan::Reimagine,
        };
        Ok((image, plan))
    }

    fn has_mask(&self) -> bool {
        matches!(self, EditPlan::Inpaint { .. } | EditPlan::Cleanup { .. })
    }
}

#[derive(Default)]
struct EditForm {
    mode: Option<String>,
    image: Option<Vec<u8>>,
    mask: Option<Vec<u8>>,
    prompt: Option<String>,
    style: Option<String>,
}

impl EditForm {
    async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "mode" => {
                    form.mode = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
                    )
                }
                "image" => {
                    form.image = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| ApiError::InvalidInput(e.to_string()))?
                            .to_vec(),
                    )
                }
                "mask" => {
                    form.mask = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| ApiError::InvalidInput(e.to_string()))?
                            .to_vec(),
                    )
                }
                "prompt" => {
                    form.prompt = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
                    )
                }
                "style" => {
                    form.style = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
                    )
                }
                other => {
                    tracing::debug!(field = other, "Ignoring unknown form field");
                }
            }
        }
        Ok(form)
    }
}

/// Apply one editing operation to an uploaded image
///
/// Multipart fields: `mode` (inpaint | cleanup | replacebg | reimagine),
/// `image` (always), `mask` (inpaint, cleanup), `prompt` (inpaint, replacebg),
/// `style` (optional, inpaint only). Responds with the edited image bytes.
#[utoipa::path(
    post,
    path = "/direct-modification",
    responses(
        (status = 200, description = "Edited image bytes"),
        (status = 400, description = "Missing field or unknown mode"),
    ),
    params(
        ("X-Session-Id" = Option<String>, Header, description = "Participant identifier for edit accounting"),
    ),
    tag = "Editing"
)]
pub async fn handle_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = EditForm::collect(multipart).await?;

    let mode_tag = form.mode.take().ok_or(ApiError::MissingField("mode"))?;
    let mode = EditMode::parse(&mode_tag).ok_or_else(|| ApiError::UnknownMode(mode_tag.clone()))?;

    let (image, plan) = EditPlan::from_form(mode, form, state.config.limits.max_prompt_chars)?;

    // Participant accounting from the session header, when the client sent one
    if let Some(session_id) = headers.get("X-Session-Id").and_then(|v| v.to_str().ok()) {
        let session = state
            .sessions
            .record_edit(SessionId::new(session_id))
            .await?;
        tracing::info!(
            session_id = %session.session_id,
            edit_count = session.edit_count,
            mode = %mode_tag,
            "Edit recorded for session"
        );
    }

    tracing::info!(
        mode = %mode_tag,
        image_bytes = image.len(),
        has_mask = plan.has_mask(),
        "Processing edit request"
    );

    let max = state.config.limits.max_image_bytes;
    let image_png = imaging::to_png(&image, max)?;

    let (bytes, content_type) = match plan {
        EditPlan::Inpaint {
            mask,
            prompt,
            style,
        } => {
            let mask_png = imaging::mask_to_binary_png(&mask, max)?;
            let style = style
                .as_deref()
                .unwrap_or(&state.config.generative.default_style);
            let url = state
                .generative
                .inpaint(image_png, mask_png, &prompt, style)
                .await?;
            // The generative provider hosts its result; fetch it so all four
            // modes answer with image bytes
            let fetched = state.generative.fetch_image(&url).await?;
            (fetched.bytes, fetched.content_type)
        }
        EditPlan::Cleanup { mask } => {
            let mask_png = imaging::mask_to_binary_png(&mask, max)?;
            let edited = state.editing.cleanup(image_png, mask_png).await?;
            (edited.bytes, edited.content_type)
        }
        EditPlan::ReplaceBg { prompt } => {
            let edited = state.editing.replace_background(image_png, &prompt).await?;
            (edited.bytes, edited.content_type)
        }
        EditPlan::Reimagine => {
            let edited = state.editing.reimagine(image_png).await?;
            (edited.bytes, edited.content_type)
        }
    };

    tracing::info!(mode = %mode_tag, result_bytes = bytes.len(), "Edit complete");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
