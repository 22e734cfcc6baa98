//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// A geographic position in decimal degrees.
///
/// Longitude wraparound is never normalized and the nominal ranges
/// (`[-90, 90]`, `[-180, 180]`) are not enforced: lattice cells around a
/// center close to a pole or the antimeridian legitimately fall outside them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite components
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() {
            return Err(ServiceError::validation(format!(
                "latitude must be a finite number, got: {latitude}"
            )));
        }
        if !longitude.is_finite() {
            return Err(ServiceError::validation(format!(
                "longitude must be a finite number, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format coordinate as a `lat, lon` string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
