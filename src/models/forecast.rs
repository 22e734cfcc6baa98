//! Forecast parameter and result models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameter used when a request does not name one (2-meter temperature)
pub const DEFAULT_PARAMETER: &str = "T2M";

/// Identifier of the physical quantity to forecast.
///
/// Opaque to the service: it is handed to the model as-is and only the model
/// decides whether it knows the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameter(String);

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self(DEFAULT_PARAMETER.to_string())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One time-indexed prediction produced by the model
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Quantity this value forecasts
    pub parameter: Parameter,
    /// Offset from the model's issue time in hours
    pub lead_hours: u32,
    /// Predicted value
    pub value: f64,
}

/// Model output, passed back to callers without reshaping
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct ForecastResult(Vec<ForecastEntry>);

impl ForecastResult {
    #[must_use]
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self(entries)
    }

    #[must_use]
    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Value of the earliest entry, the one the heatmap samples
    #[must_use]
    pub fn first_value(&self) -> Option<f64> {
        self.0.first().map(|entry| entry.value)
    }
}
