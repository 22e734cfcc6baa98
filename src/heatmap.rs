//! Heatmap grid sampling
//!
//! A heatmap is a fixed 10×10 lattice of forecasts around a center point. The
//! lattice starts one degree south-west of the center and advances in 0.2°
//! steps, so it covers offsets `-1.0..=0.8` on both axes: one row and one
//! column short of a symmetric square. Callers depend on these exact
//! coordinates.
//!
//! Sampling is best effort: a cell whose forecast fails carries the absent
//! marker and the remaining cells are unaffected. The heatmap always has
//! exactly [`GRID_CELLS`] points in row-major order.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::ServiceError;
use crate::forecast::ForecastService;
use crate::models::{Coordinate, DEFAULT_PARAMETER, GridPoint, Heatmap, Parameter};

/// Cells per lattice axis
pub const GRID_SIZE: usize = 10;
/// Total cells in a heatmap
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;
/// Distance between neighbouring cells in degrees
pub const GRID_STEP: f64 = 0.2;
/// Offset of the first row/column from the center in degrees
pub const GRID_ORIGIN_OFFSET: f64 = 1.0;

/// Why a single cell ended up without a value
#[derive(Error, Debug)]
pub enum CellFailure {
    #[error(transparent)]
    Forecast(#[from] ServiceError),

    #[error("forecast has no entries")]
    MissingValue,

    #[error("forecast value {0} is not finite")]
    NonFiniteValue(f64),
}

/// Lattice coordinates around `center`, row-major (latitude outer).
///
/// Cell `(i, j)` sits at index `GRID_SIZE * i + j`.
#[must_use]
pub fn lattice(center: Coordinate) -> Vec<Coordinate> {
    let mut cells = Vec::with_capacity(GRID_CELLS);
    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            cells.push(Coordinate {
                latitude: center.latitude - GRID_ORIGIN_OFFSET + i as f64 * GRID_STEP,
                longitude: center.longitude - GRID_ORIGIN_OFFSET + j as f64 * GRID_STEP,
            });
        }
    }
    cells
}

/// Builds heatmaps by running one forecast per lattice cell
pub struct GridSampler {
    service: Arc<ForecastService>,
    concurrency: usize,
}

impl GridSampler {
    /// Sampler evaluating one cell at a time
    pub fn new(service: Arc<ForecastService>) -> Self {
        Self::with_concurrency(service, 1)
    }

    /// Sampler evaluating up to `concurrency` cells at once
    pub fn with_concurrency(service: Arc<ForecastService>, concurrency: usize) -> Self {
        Self {
            service,
            concurrency: concurrency.max(1),
        }
    }

    /// Sample the `T2M` heatmap around (`center_lat`, `center_lon`).
    ///
    /// Fails only when the center is not a valid coordinate; per-cell
    /// failures are absorbed into the grid.
    #[instrument(skip(self))]
    pub async fn build_heatmap(&self, center_lat: f64, center_lon: f64) -> crate::Result<Heatmap> {
        let center = Coordinate::new(center_lat, center_lon)?;
        let parameter = Parameter::new(DEFAULT_PARAMETER);

        let grid: Vec<GridPoint> = stream::iter(lattice(center).into_iter().enumerate())
            .map(|(index, cell)| {
                let parameter = &parameter;
                async move {
                    let temp = match self.sample_cell(cell, parameter).await {
                        Ok(value) => Some(value),
                        Err(e) => {
                            debug!(cell = index, "Heatmap cell without value: {}", e);
                            None
                        }
                    };
                    GridPoint {
                        lat: cell.latitude,
                        lon: cell.longitude,
                        temp,
                    }
                }
            })
            // `buffered` yields in input order, keeping the grid row-major
            .buffered(self.concurrency)
            .collect()
            .await;

        let heatmap = Heatmap { grid };
        let absent = heatmap.absent_count();
        if absent > 0 {
            warn!(
                "Heatmap around {} has {}/{} cells without a value",
                center.format_coordinates(),
                absent,
                GRID_CELLS
            );
        }
        Ok(heatmap)
    }

    async fn sample_cell(
        &self,
        cell: Coordinate,
        parameter: &Parameter,
    ) -> Result<f64, CellFailure> {
        let result = self.service.forecast_at(cell, parameter).await?;
        match result.first_value() {
            None => Err(CellFailure::MissingValue),
            Some(value) if !value.is_finite() => Err(CellFailure::NonFiniteValue(value)),
            Some(value) => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ModelHandle;
    use crate::testing::{EchoModel, handle_for};
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    fn sampler(model: EchoModel, concurrency: usize) -> (GridSampler, Arc<EchoModel>) {
        let (handle, _, model) = handle_for(model);
        let service = Arc::new(ForecastService::new(handle));
        (GridSampler::with_concurrency(service, concurrency), model)
    }

    #[rstest]
    #[case(0, 9.0, 19.0)]
    #[case(9, 9.0, 20.8)]
    #[case(10, 9.2, 19.0)]
    #[case(55, 10.0, 20.0)]
    #[case(99, 10.8, 20.8)]
    fn test_lattice_coordinates(
        #[case] index: usize,
        #[case] lat: f64,
        #[case] lon: f64,
    ) {
        let cells = lattice(Coordinate::new(10.0, 20.0).unwrap());
        assert_eq!(cells.len(), GRID_CELLS);
        assert!((cells[index].latitude - lat).abs() < EPSILON);
        assert!((cells[index].longitude - lon).abs() < EPSILON);
    }

    #[test]
    fn test_lattice_span_is_asymmetric() {
        let cells = lattice(Coordinate::new(0.0, 0.0).unwrap());
        let max_lat = cells.iter().map(|c| c.latitude).fold(f64::MIN, f64::max);
        let min_lat = cells.iter().map(|c| c.latitude).fold(f64::MAX, f64::min);
        let max_lon = cells.iter().map(|c| c.longitude).fold(f64::MIN, f64::max);

        assert!((min_lat + 1.0).abs() < EPSILON);
        assert!((max_lat - 0.8).abs() < EPSILON);
        assert!((max_lon - 0.8).abs() < EPSILON);
    }

    #[tokio::test]
    async fn test_heatmap_has_one_value_per_cell() {
        let (sampler, model) = sampler(EchoModel::default(), 1);
        let heatmap = sampler.build_heatmap(10.0, 20.0).await.unwrap();

        assert_eq!(heatmap.grid.len(), GRID_CELLS);
        assert_eq!(heatmap.absent_count(), 0);
        assert_eq!(model.calls(), GRID_CELLS);

        let first = heatmap.grid[0];
        assert!((first.lat - 9.0).abs() < EPSILON);
        assert!((first.lon - 19.0).abs() < EPSILON);
        assert_eq!(first.temp, Some(first.lat + first.lon));

        let last = heatmap.grid[99];
        assert!((last.lat - 10.8).abs() < EPSILON);
        assert!((last.lon - 20.8).abs() < EPSILON);
    }

    #[tokio::test]
    async fn test_failed_cell_is_absent_and_others_unaffected() {
        let center = Coordinate::new(10.0, 20.0).unwrap();
        let target = lattice(center)[23];
        let (sampler, _) = sampler(
            EchoModel {
                fail_at: Some(target),
                ..EchoModel::default()
            },
            1,
        );

        let heatmap = sampler.build_heatmap(10.0, 20.0).await.unwrap();

        assert_eq!(heatmap.grid.len(), GRID_CELLS);
        assert_eq!(heatmap.grid[23].temp, None);
        for (index, point) in heatmap.grid.iter().enumerate() {
            if index != 23 {
                assert_eq!(point.temp, Some(point.lat + point.lon));
            }
        }
    }

    #[tokio::test]
    async fn test_empty_cell_result_is_absent() {
        let center = Coordinate::new(-33.9, 151.2).unwrap();
        let target = lattice(center)[0];
        let (sampler, _) = sampler(
            EchoModel {
                empty_at: Some(target),
                ..EchoModel::default()
            },
            1,
        );

        let heatmap = sampler.build_heatmap(-33.9, 151.2).await.unwrap();
        assert_eq!(heatmap.grid[0].temp, None);
        assert_eq!(heatmap.absent_count(), 1);
    }

    #[tokio::test]
    async fn test_unloadable_model_yields_all_absent_cells() {
        let handle = Arc::new(ModelHandle::from_artifact("missing/latest.json"));
        let sampler = GridSampler::new(Arc::new(ForecastService::new(handle)));

        let heatmap = sampler.build_heatmap(48.1, 11.6).await.unwrap();

        assert_eq!(heatmap.grid.len(), GRID_CELLS);
        assert_eq!(heatmap.absent_count(), GRID_CELLS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sampling_preserves_row_major_order() {
        let (sequential, _) = sampler(EchoModel::default(), 1);
        let (concurrent, model) = sampler(EchoModel::default(), 8);

        let expected = sequential.build_heatmap(52.5, 13.4).await.unwrap();
        let actual = concurrent.build_heatmap(52.5, 13.4).await.unwrap();

        assert_eq!(actual, expected);
        assert_eq!(model.calls(), GRID_CELLS);
    }

    #[tokio::test]
    async fn test_invalid_center_is_rejected() {
        let (sampler, model) = sampler(EchoModel::default(), 1);
        let err = sampler.build_heatmap(f64::NAN, 0.0).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation { .. }));
        assert_eq!(model.calls(), 0);
    }
}
