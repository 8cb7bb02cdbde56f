use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from an optional YAML file.
///
/// Every field has a default so the server starts with an empty or missing
/// config file; secrets never live here (see [`Secrets`]).
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Browser origins allowed by the CORS layer
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Generative image provider (generation + inpainting)
    #[serde(default)]
    pub generative: GenerativeConfig,

    /// Editing provider (cleanup, background replacement, reimagine)
    #[serde(default)]
    pub editing: EditingConfig,

    /// Cloud media store for archiving final images
    #[serde(default)]
    pub media_store: MediaStoreConfig,

    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_style")]
    pub default_style: String,

    #[serde(default = "default_size")]
    pub default_size: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditingConfig {
    #[serde(default = "default_editing_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaStoreConfig {
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Limits {
    /// Maximum accepted image payload before decoding
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Prompts longer than this are truncated, not rejected
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

fn default_generative_base_url() -> String {
    "https://external.api.recraft.ai".to_string()
}

fn default_model() -> String {
    "recraftv3".to_string()
}

fn default_style() -> String {
    "realistic_image".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

fn default_editing_base_url() -> String {
    "https://clipdrop-api.co".to_string()
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_prompt_chars() -> usize {
    1000
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: default_generative_base_url(),
            model: default_model(),
            default_style: default_style(),
            default_size: default_size(),
        }
    }
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            base_url: default_editing_base_url(),
        }
    }
}

impl Default for MediaStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            generative: GenerativeConfig::default(),
            editing: EditingConfig::default(),
            media_store: MediaStoreConfig::default(),
            limits: Limits::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file is absent or unparsable.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file set, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        cors_origins = config.cors_origins.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

/// Provider credentials, supplied via environment variables in production and
/// constructed directly in tests.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub generative_token: Option<String>,
    pub editing_key: Option<String>,
    pub media_store_api_key: Option<String>,
    pub media_store_api_secret: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            generative_token: std::env::var("GENERATIVE_API_TOKEN").ok(),
            editing_key: std::env::var("EDITING_API_KEY").ok(),
            media_store_api_key: std::env::var("MEDIA_STORE_API_KEY").ok(),
            media_store_api_secret: std::env::var("MEDIA_STORE_API_SECRET").ok(),
        }
    }
}
