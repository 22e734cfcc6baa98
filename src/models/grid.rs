//! Heatmap grid models

use serde::{Deserialize, Serialize};

/// A sampled lattice cell. `temp` is `None` when the cell's forecast failed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
    pub temp: Option<f64>,
}

/// Heatmap response body, cells in row-major order
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Heatmap {
    pub grid: Vec<GridPoint>,
}

impl Heatmap {
    /// Number of cells that carry the absent marker
    #[must_use]
    pub fn absent_count(&self) -> usize {
        self.grid.iter().filter(|point| point.temp.is_none()).count()
    }
}
