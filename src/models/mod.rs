pub mod config;
pub mod session;

pub use config::{AppConfig, EditingConfig, GenerativeConfig, Limits, MediaStoreConfig, Secrets};
pub use session::{Session, SessionId};
