//! Request and response bodies of the HTTP API
//!
//! Requests are validated while they are deserialized, so handlers only ever
//! see well-formed coordinates.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::models::Parameter;

/// Body of `POST /forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastRequest {
    #[serde(deserialize_with = "coercible_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "coercible_f64")]
    pub lon: f64,
    #[serde(default)]
    parameter: Option<Parameter>,
    /// Older clients send the quantity as `property`
    #[serde(default)]
    property: Option<Parameter>,
}

impl ForecastRequest {
    /// Requested quantity. `parameter` wins over `property`; a missing or
    /// `null` value falls back to `T2M`.
    #[must_use]
    pub fn parameter(&self) -> Parameter {
        self.parameter
            .as_ref()
            .or(self.property.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

/// Body of `POST /heatmap`
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapRequest {
    #[serde(deserialize_with = "coercible_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "coercible_f64")]
    pub lon: f64,
}

/// Body of `POST /login`; absent fields count as wrong credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionBody {
    pub version: String,
}

/// Accepts a JSON number or a string holding one, like `"47.5"`.
///
/// Non-finite results are rejected so they never reach the model.
fn coercible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoercibleF64;

    impl Visitor<'_> for CoercibleF64 {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(E::custom(format!("{value} is not a finite number")))
            }
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            let parsed = value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))?;
            self.visit_f64(parsed)
        }
    }

    deserializer.deserialize_any(CoercibleF64)
}
