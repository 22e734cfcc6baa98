//! Data models for the forecast service
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: Geographic positions
//! - Forecast: Parameters and model output
//! - Grid: Heatmap lattice cells

pub mod coordinate;
pub mod forecast;
pub mod grid;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use forecast::{DEFAULT_PARAMETER, ForecastEntry, ForecastResult, Parameter};
pub use grid::{GridPoint, Heatmap};
