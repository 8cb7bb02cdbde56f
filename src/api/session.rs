use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{Session, SessionId};
use crate::server::AppState;
use crate::services::SessionStore;

/// Request body for registering a participant session
#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionRequest {
    pub session_id: String,
}

/// Acknowledgement of a stored session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub session_id: String,
}

/// Register or refresh a participant session
#[utoipa::path(
    post,
    path = "/session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session stored", body = SessionResponse),
        (status = 400, description = "Missing session_id"),
    ),
    tag = "Session"
)]
pub async fn handle_put_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::MissingField("session_id"));
    }

    let session = state
        .sessions
        .upsert(SessionId::new(request.session_id))
        .await?;

    tracing::info!(session_id = %session.session_id, "Session stored");

    Ok(Json(SessionResponse {
        success: true,
        session_id: session.session_id.to_string(),
    }))
}

/// Read back a stored participant session
#[utoipa::path(
    get,
    path = "/session/{id}",
    responses(
        (status = 200, description = "Session record", body = Session),
        (status = 404, description = "Unknown session"),
    ),
    params(
        ("id" = String, Path, description = "Participant identifier"),
    ),
    tag = "Session"
)]
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .sessions
        .find(&SessionId::new(id))
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(session))
}
