//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::models::{AppConfig, Secrets};
use crate::services::{EditingClient, GenerativeClient, InMemorySessionStore, MediaStoreClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<InMemorySessionStore>,
    pub generative: Arc<GenerativeClient>,
    pub editing: Arc<EditingClient>,
    pub media_store: Arc<MediaStoreClient>,
}

/// Create application state from configuration and provider credentials.
pub fn create_app_state(config: AppConfig, secrets: Secrets) -> anyhow::Result<AppState> {
    let generative = Arc::new(GenerativeClient::new(
        &config.generative,
        secrets.generative_token,
    )?);
    let editing = Arc::new(EditingClient::new(&config.editing, secrets.editing_key)?);
    let media_store = Arc::new(MediaStoreClient::new(
        &config.media_store,
        secrets.media_store_api_key,
        secrets.media_store_api_secret,
    )?);

    Ok(AppState {
        config: Arc::new(config),
        sessions: Arc::new(InMemorySessionStore::new()),
        generative,
        editing,
        media_store,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Base64 data URLs inflate images by ~4/3; leave headroom for JSON and
    // multipart framing on top of the configured image cap
    let body_limit = state.config.limits.max_image_bytes / 2 * 3;

    Router::new()
        .route("/", get(handle_home))
        .route("/health", get(handle_health))
        .route("/generate-image", post(api::handle_generate))
        .route("/proxy-image", get(api::handle_proxy))
        .route("/direct-modification", post(api::handle_edit))
        .route("/save-final-image", post(api::handle_save_final_image))
        .route("/session", post(api::handle_put_session))
        .route("/session/:id", get(api::handle_get_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Build the CORS layer from the configured browser origins.
///
/// With no origins configured the layer stays permissive (local development);
/// with origins it pins them and allows credentialed requests, which is what
/// the survey platform's embedded client needs.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_headers = [
        header::CONTENT_TYPE,
        header::ORIGIN,
        header::ACCEPT,
        HeaderName::from_static("x-session-id"),
    ];

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allow_headers)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allow_headers)
            .allow_credentials(true)
            .expose_headers([header::CONTENT_TYPE])
    }
}

async fn handle_home() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "Welcome to the Easel image service",
    }))
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "message": "Service is running",
    }))
}
