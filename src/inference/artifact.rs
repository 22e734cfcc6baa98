//! Persisted model artifacts
//!
//! The shipped artifact is a linear per-parameter model. It is stored either
//! as JSON (`.json`) or as postcard binary (`.bin`, `.postcard`); the file
//! extension selects the decoder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ForecastModel, ModelLoader};
use crate::models::{Coordinate, ForecastEntry, ForecastResult, Parameter};

/// On-disk encoding of a model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Postcard,
}

impl ArtifactFormat {
    /// Pick the encoding from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("bin") | Some("postcard") => Ok(ArtifactFormat::Postcard),
            other => Err(anyhow!(
                "Unsupported model artifact extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            )),
        }
    }
}

/// Coefficients of one forecast parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    pub intercept: f64,
    pub lat_weight: f64,
    pub lon_weight: f64,
    /// Change per hour of lead time
    pub lead_weight: f64,
}

impl LinearCoefficients {
    fn evaluate(&self, coordinate: Coordinate, lead_hours: u32) -> f64 {
        self.intercept
            + self.lat_weight * coordinate.latitude
            + self.lon_weight * coordinate.longitude
            + self.lead_weight * f64::from(lead_hours)
    }

    fn is_finite(&self) -> bool {
        self.intercept.is_finite()
            && self.lat_weight.is_finite()
            && self.lon_weight.is_finite()
            && self.lead_weight.is_finite()
    }
}

/// Linear forecast model as persisted by the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearForecastModel {
    pub name: String,
    pub version: String,
    /// Lead times emitted for every prediction, in output order
    pub lead_hours: Vec<u32>,
    /// Coefficients keyed by parameter identifier
    pub parameters: BTreeMap<String, LinearCoefficients>,
    /// Set while the model is owned by the training pipeline
    #[serde(default)]
    pub training: bool,
}

impl LinearForecastModel {
    /// Switch the model into inference mode
    #[must_use]
    pub fn eval(mut self) -> Self {
        self.training = false;
        self
    }

    #[must_use]
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Check structural soundness of a freshly decoded artifact
    pub fn validate(&self) -> Result<()> {
        if self.lead_hours.is_empty() {
            bail!("model artifact '{}' declares no lead hours", self.name);
        }
        if self.parameters.is_empty() {
            bail!("model artifact '{}' declares no parameters", self.name);
        }
        if let Some((name, _)) = self.parameters.iter().find(|(_, c)| !c.is_finite()) {
            bail!(
                "model artifact '{}' has non-finite coefficients for parameter '{}'",
                self.name,
                name
            );
        }
        Ok(())
    }
}

impl ForecastModel for LinearForecastModel {
    fn predict(&self, coordinate: Coordinate, parameter: &Parameter) -> Result<ForecastResult> {
        if self.training {
            bail!("model '{}' is in training mode", self.name);
        }

        let coefficients = self
            .parameters
            .get(parameter.as_str())
            .ok_or_else(|| anyhow!("unknown parameter '{}'", parameter))?;

        let entries = self
            .lead_hours
            .iter()
            .map(|&lead_hours| {
                let value = coefficients.evaluate(coordinate, lead_hours);
                if !value.is_finite() {
                    bail!(
                        "non-finite prediction for '{}' at {} (+{}h)",
                        parameter,
                        coordinate.format_coordinates(),
                        lead_hours
                    );
                }
                Ok(ForecastEntry {
                    parameter: parameter.clone(),
                    lead_hours,
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastResult::new(entries))
    }
}

/// Loads a [`LinearForecastModel`] from a fixed path
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    path: PathBuf,
}

impl ArtifactLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn decode(&self) -> Result<LinearForecastModel> {
        let format = ArtifactFormat::from_path(&self.path)?;
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read model artifact {}", self.path.display()))?;
        debug!("Read {} bytes of {:?} model artifact", bytes.len(), format);

        let model = match format {
            ArtifactFormat::Json => serde_json::from_slice(&bytes).with_context(|| {
                format!("Malformed JSON model artifact {}", self.path.display())
            })?,
            ArtifactFormat::Postcard => postcard::from_bytes(&bytes).with_context(|| {
                format!("Malformed postcard model artifact {}", self.path.display())
            })?,
        };
        Ok(model)
    }
}

impl ModelLoader for ArtifactLoader {
    fn load(&self) -> Result<Arc<dyn ForecastModel>> {
        let model = self.decode()?;
        model.validate()?;
        debug!(
            "Decoded model '{}' version {} with {} parameters",
            model.name,
            model.version,
            model.parameters.len()
        );
        Ok(Arc::new(model.eval()))
    }
}
