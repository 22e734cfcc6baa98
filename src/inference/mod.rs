//! Model acquisition and invocation
//!
//! The forecast model is a black box: a function of
//! (coordinate, parameter) → time-indexed values. This module defines that
//! contract, the loader seam used to materialize a model from storage, and the
//! process-wide [`ModelHandle`] that guarantees a single load.

pub mod artifact;
pub mod handle;

use std::sync::Arc;

use crate::models::{Coordinate, ForecastResult, Parameter};

pub use artifact::{ArtifactFormat, ArtifactLoader, LinearCoefficients, LinearForecastModel};
pub use handle::ModelHandle;

/// A trained model ready for inference.
pub trait ForecastModel: Send + Sync {
    /// Run inference for a single coordinate.
    fn predict(&self, coordinate: Coordinate, parameter: &Parameter)
    -> anyhow::Result<ForecastResult>;
}

/// Materializes a model from its persisted form.
///
/// Called from the blocking thread pool at most once per [`ModelHandle`].
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> anyhow::Result<Arc<dyn ForecastModel>>;
}
