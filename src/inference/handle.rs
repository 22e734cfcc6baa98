use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tokio::task;
use tracing::{error, info};

use super::{ArtifactLoader, ForecastModel, ModelLoader};
use crate::ServiceError;

type LoadOutcome = std::result::Result<Arc<dyn ForecastModel>, String>;

/// Owner of the loaded forecast model.
///
/// The first call to [`ModelHandle::get_model`] runs the loader; concurrent
/// first callers wait on the same initialization. The outcome is kept for the
/// life of the handle, failures included, so the artifact is read at most once.
///
/// The slot is filled from the blocking pool, so a caller dropped mid-load
/// does not abandon the initialization.
pub struct ModelHandle {
    loader: Arc<dyn ModelLoader>,
    slot: Arc<OnceLock<LoadOutcome>>,
}

impl ModelHandle {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Handle backed by the artifact file at `path`
    pub fn from_artifact(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(ArtifactLoader::new(path)))
    }

    /// Whether a load has already completed, successfully or not
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the loaded model, loading it on first use.
    #[tracing::instrument(name = "get_model", level = "debug", skip(self))]
    pub async fn get_model(&self) -> crate::Result<Arc<dyn ForecastModel>> {
        let outcome = match self.slot.get() {
            Some(outcome) => outcome.clone(),
            None => {
                let slot = Arc::clone(&self.slot);
                let loader = Arc::clone(&self.loader);
                task::spawn_blocking(move || slot.get_or_init(|| load_once(&*loader)).clone())
                    .await
                    .map_err(|e| ServiceError::load(format!("model loader task failed: {e}")))?
            }
        };
        outcome.map_err(ServiceError::load)
    }
}

fn load_once(loader: &dyn ModelLoader) -> LoadOutcome {
    info!("Loading forecast model");
    let start = Instant::now();

    let outcome = loader.load().map_err(|e| format!("{e:#}"));
    match &outcome {
        Ok(_) => info!(
            "Forecast model loaded in {:.3}s",
            start.elapsed().as_secs_f64()
        ),
        Err(message) => error!("Failed to load forecast model: {}", message),
    }
    outcome
}
