//! `forecast-service` - HTTP serving for a point-forecast weather model
//!
//! This library provides lazy model acquisition, single-point inference and
//! the heatmap grid sampler, together with the HTTP gateway exposing them.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forecast;
pub mod heatmap;
pub mod inference;
pub mod logging;
pub mod models;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export core types for public API
pub use api::AppState;
pub use auth::{CredentialVerifier, StaticCredentials};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use forecast::ForecastService;
pub use heatmap::{GRID_CELLS, GridSampler};
pub use inference::{ForecastModel, ModelHandle, ModelLoader};
pub use models::{Coordinate, ForecastEntry, ForecastResult, GridPoint, Heatmap, Parameter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
