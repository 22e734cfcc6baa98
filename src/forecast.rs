//! Single-point forecast service
//!
//! Obtains the model from the shared [`ModelHandle`] and runs one inference
//! per call. Results are never cached: every call re-runs the model.

use std::sync::Arc;

use tokio::task;
use tracing::{debug, instrument};

use crate::inference::ModelHandle;
use crate::models::{Coordinate, ForecastResult, Parameter};
use crate::{Result, ServiceError};

/// Forecast service
pub struct ForecastService {
    handle: Arc<ModelHandle>,
}

impl ForecastService {
    pub fn new(handle: Arc<ModelHandle>) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> &Arc<ModelHandle> {
        &self.handle
    }

    /// Forecast `parameter` at (`lat`, `lon`).
    ///
    /// Coordinates are validated before the model is touched. Model failures
    /// come back as [`ServiceError::Forecast`] with the model's message, an
    /// unloadable artifact as [`ServiceError::Load`].
    #[instrument(skip(self))]
    pub async fn run_forecast(
        &self,
        lat: f64,
        lon: f64,
        parameter: &Parameter,
    ) -> Result<ForecastResult> {
        let coordinate = Coordinate::new(lat, lon)?;
        self.forecast_at(coordinate, parameter).await
    }

    /// Forecast at an already validated coordinate
    pub async fn forecast_at(
        &self,
        coordinate: Coordinate,
        parameter: &Parameter,
    ) -> Result<ForecastResult> {
        let model = self.handle.get_model().await?;

        let model_parameter = parameter.clone();
        let result = task::spawn_blocking(move || model.predict(coordinate, &model_parameter))
            .await
            .map_err(|e| ServiceError::forecast(format!("inference task failed: {e}")))?
            .map_err(|e| ServiceError::forecast(format!("{e:#}")))?;

        if result.is_empty() {
            return Err(ServiceError::forecast(format!(
                "model returned no entries for '{}' at {}",
                parameter,
                coordinate.format_coordinates()
            )));
        }

        debug!(
            "Forecast for {} produced {} entries",
            coordinate.format_coordinates(),
            result.len()
        );
        Ok(result)
    }
}
