//! Stub models and loaders shared by unit tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::inference::{ForecastModel, ModelHandle, ModelLoader};
use crate::models::{Coordinate, ForecastEntry, ForecastResult, Parameter};

/// Predicts `lat + lon` and fails for one configured coordinate
#[derive(Default)]
pub struct EchoModel {
    pub calls: AtomicUsize,
    pub fail_at: Option<Coordinate>,
    pub empty_at: Option<Coordinate>,
}

impl EchoModel {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ForecastModel for EchoModel {
    fn predict(
        &self,
        coordinate: Coordinate,
        parameter: &Parameter,
    ) -> anyhow::Result<ForecastResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(coordinate) {
            anyhow::bail!("simulated failure at {}", coordinate.format_coordinates());
        }
        if self.empty_at == Some(coordinate) {
            return Ok(ForecastResult::default());
        }
        Ok(ForecastResult::new(vec![
            ForecastEntry {
                parameter: parameter.clone(),
                lead_hours: 0,
                value: coordinate.latitude + coordinate.longitude,
            },
            ForecastEntry {
                parameter: parameter.clone(),
                lead_hours: 6,
                value: coordinate.latitude - coordinate.longitude,
            },
        ]))
    }
}

/// Hands out a prepared model and counts loads
pub struct StaticLoader {
    pub model: Arc<EchoModel>,
    pub loads: AtomicUsize,
}

impl ModelLoader for StaticLoader {
    fn load(&self) -> anyhow::Result<Arc<dyn ForecastModel>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.model.clone())
    }
}

/// Handle over `model` together with its loader for load-count assertions
pub fn handle_for(model: EchoModel) -> (Arc<ModelHandle>, Arc<StaticLoader>, Arc<EchoModel>) {
    let model = Arc::new(model);
    let loader = Arc::new(StaticLoader {
        model: model.clone(),
        loads: AtomicUsize::new(0),
    });
    let handle = Arc::new(ModelHandle::new(loader.clone()));
    (handle, loader, model)
}
