//! Configuration management for the forecast service
//!
//! Settings come from an optional TOML file overlaid with `FORECAST__*`
//! environment variables, then get defaulted and validated.

use crate::ServiceError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the forecast service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Model artifact configuration
    pub model: ModelConfig,
    /// Heatmap sampling configuration
    pub grid: GridConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Login credentials
    pub auth: AuthConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Model artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the persisted model artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
    /// Load the model before accepting requests instead of on first use
    #[serde(default)]
    pub preload: bool,
}

/// Heatmap sampling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of lattice cells forecast at the same time
    #[serde(default = "default_grid_concurrency")]
    pub concurrency: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Credentials accepted by the login endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<UserCredential>,
}

/// A single username/password pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub username: String,
    pub password: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("models/latest.json")
}

fn default_grid_concurrency() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            preload: false,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            concurrency: default_grid_concurrency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ServiceConfig {
    /// Load from `config_path`, falling back to the user config dir, then `./config.toml`
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FORECAST__SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("FORECAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ServiceConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        Ok(config)
    }

    /// Apply command-line overrides; call [`ServiceConfig::validate`] afterwards
    #[must_use]
    pub fn with_overrides(mut self, port: Option<u16>, log_level: Option<String>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        self
    }

    /// `<config dir>/forecast-service/config.toml`, when the platform has a config dir
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("forecast-service").join("config.toml"))
    }

    /// Replace empty or zero settings with their defaults
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.model.artifact_path.as_os_str().is_empty() {
            self.model.artifact_path = default_artifact_path();
        }
        if self.grid.concurrency == 0 {
            self.grid.concurrency = default_grid_concurrency();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_credentials()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServiceError::config("Server port must be between 1 and 65535").into());
        }

        if self.server.max_body_bytes == 0 {
            return Err(ServiceError::config("Maximum request body size cannot be zero").into());
        }

        if !(1..=100).contains(&self.grid.concurrency) {
            return Err(ServiceError::config(format!(
                "Grid concurrency must be between 1 and 100, got: {}",
                self.grid.concurrency
            ))
            .into());
        }

        Ok(())
    }

    /// Validate enumerated and path settings
    fn validate_string_values(&self) -> Result<()> {
        ensure_one_of(
            "log level",
            &self.logging.level,
            &["error", "warn", "info", "debug", "trace"],
        )?;
        ensure_one_of("log format", &self.logging.format, &["pretty", "json"])?;

        if self.model.artifact_path.as_os_str().is_empty() {
            return Err(ServiceError::config("Model artifact path cannot be empty").into());
        }

        Ok(())
    }

    /// Validate configured login credentials
    fn validate_credentials(&self) -> Result<()> {
        if self.auth.users.iter().any(|user| user.username.trim().is_empty()) {
            return Err(ServiceError::config("Usernames cannot be empty").into());
        }
        Ok(())
    }
}

fn ensure_one_of(setting: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ServiceError::config(format!(
        "Invalid {setting} '{value}'. Must be one of: {}",
        allowed.join(", ")
    ))
    .into())
}
