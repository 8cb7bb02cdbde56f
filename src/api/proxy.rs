use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::imaging;
use crate::server::AppState;

/// Query parameters for the image proxy
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    #[serde(default)]
    pub url: Option<String>,
}

/// Fetch a remote image and return it as PNG
///
/// Lets the browser canvas load provider-hosted images without tripping over
/// their CORS policy, normalizing the format to PNG on the way through.
#[utoipa::path(
    get,
    path = "/proxy-image",
    responses(
        (status = 200, description = "Proxied image as PNG"),
        (status = 400, description = "Missing url parameter"),
        (status = 502, description = "Remote fetch failed"),
    ),
    params(
        ("url" = String, Query, description = "Remote image URL to fetch"),
    ),
    tag = "Editing"
)]
pub async fn handle_proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let url = query.url.ok_or(ApiError::MissingField("url"))?;

    tracing::debug!(url = %url, "Proxying image");

    let fetched = state.generative.fetch_image(&url).await?;
    let png = imaging::to_png(&fetched.bytes, state.config.limits.max_image_bytes)
        .map_err(|e| ApiError::Upstream(format!("remote image unusable: {e}")))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(png))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
