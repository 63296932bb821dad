//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `SESSION_KEEPER` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use session_keeper::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway at {}", config.gateway.base_url);
//! ```

mod error;

pub use error::{ConfigError, ValidationError};

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::EngineRoutes;
use crate::domain::foundation::Route;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote auth gateway (base URL, timeout)
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Routes the engine navigates to
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Durable local mirror location
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the auth API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Returns the request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Engine navigation routes
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_landing_route")]
    pub landing: String,

    #[serde(default = "default_login_route")]
    pub login: String,

    #[serde(default = "default_password_reset_route")]
    pub password_reset: String,
}

impl RoutesConfig {
    /// Converts into the engine's route table.
    pub fn engine_routes(&self) -> EngineRoutes {
        EngineRoutes {
            landing: Route::new(&self.landing),
            login: Route::new(&self.login),
            password_reset: Route::new(&self.password_reset),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            landing: default_landing_route(),
            login: default_login_route(),
            password_reset: default_password_reset_route(),
        }
    }
}

/// Durable mirror configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the mirrored user record and settings
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_landing_route() -> String {
    "/dashboard".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_password_reset_route() -> String {
    "/password-reset".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/session")
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `SESSION_KEEPER` prefix, e.g.
    /// `SESSION_KEEPER__GATEWAY__BASE_URL=https://api.example.com`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SESSION_KEEPER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(ConfigError::LoadError)?;

        config
            .try_deserialize::<AppConfig>()
            .map_err(ConfigError::LoadError)
    }

    /// Validates the loaded configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.gateway.base_url.starts_with("http://")
            && !self.gateway.base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.routes.landing.starts_with('/') {
            return Err(ValidationError::InvalidRoute("landing"));
        }
        if !self.routes.login.starts_with('/') {
            return Err(ValidationError::InvalidRoute("login"));
        }
        if !self.routes.password_reset.starts_with('/') {
            return Err(ValidationError::InvalidRoute("password_reset"));
        }
        Ok(())
    }
}
