pub mod editing;
pub mod generative;
pub mod media_store;
pub mod session_store;

pub use editing::{EditedImage, EditingClient};
pub use generative::{FetchedImage, GenerativeClient};
pub use media_store::{MediaStoreClient, UploadReceipt};
pub use session_store::{InMemorySessionStore, SessionStore};

use crate::error::ApiError;

/// Turn a non-2xx provider response into an [`ApiError::Provider`] carrying
/// the upstream status and body text.
pub(crate) async fn provider_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status, message = %message, "Provider request failed");
    ApiError::Provider { status, message }
}
