pub mod archive;
pub mod edit;
pub mod generate;
pub mod proxy;
pub mod session;

pub use archive::{handle_save_final_image, SaveImageRequest, SaveImageResponse, __path_handle_save_final_image};
pub use edit::{handle_edit, EditMode, __path_handle_edit};
pub use generate::{handle_generate, GenerateRequest, GenerateResponse, __path_handle_generate};
pub use proxy::{handle_proxy, __path_handle_proxy};
pub use session::{
    handle_get_session, handle_put_session, SessionRequest, SessionResponse,
    __path_handle_get_session, __path_handle_put_session,
};

/// Truncate over-long prompts instead of rejecting them, matching the browser
/// client's own clamp.
pub(crate) fn clamp_prompt(prompt: &str, max_chars: usize) -> String {
    prompt.trim().chars().take(max_chars).collect()
}
