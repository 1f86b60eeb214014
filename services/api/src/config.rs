//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use ancient_eats_core::ports::{ImageQuality, ImageSize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// Literal credential value meaning "no real credential configured"; it forces
/// the image generator into demo mode.
pub const DEMO_API_KEY: &str = "demo-key";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub state_dir: PathBuf,
    pub log_level: Level,
    pub payment_base_url: String,
    pub wallet_private_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub image_model: String,
    pub image_size: ImageSize,
    pub image_quality: ImageQuality,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Storage Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let state_dir = std::env::var("STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./state"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Payment Settings ---
        let payment_base_url = std::env::var("PAYMENT_BASE_URL")
            .unwrap_or_else(|_| "https://payments.vistara.dev".to_string());
        let wallet_private_key = std::env::var("WALLET_PRIVATE_KEY").ok();

        // --- Load Image-Generation Settings (credential is optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let image_model =
            std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".to_string());
        let image_size = std::env::var("IMAGE_SIZE")
            .unwrap_or_else(|_| "1024x1024".to_string())
            .parse::<ImageSize>()
            .map_err(|e| ConfigError::InvalidValue("IMAGE_SIZE".to_string(), e))?;
        let image_quality = std::env::var("IMAGE_QUALITY")
            .unwrap_or_else(|_| "standard".to_string())
            .parse::<ImageQuality>()
            .map_err(|e| ConfigError::InvalidValue("IMAGE_QUALITY".to_string(), e))?;

        Ok(Self {
            bind_address,
            state_dir,
            log_level,
            payment_base_url,
            wallet_private_key,
            openai_api_key,
            image_model,
            image_size,
            image_quality,
        })
    }

    /// A real credential: present and not the demo sentinel.
    pub fn live_openai_api_key(&self) -> Option<&str> {
        match self.openai_api_key.as_deref() {
            Some(DEMO_API_KEY) | None => None,
            Some(key) => Some(key),
        }
    }
}
