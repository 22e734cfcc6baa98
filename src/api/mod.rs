//! HTTP request gateway
//!
//! Parses and validates request bodies, dispatches to the forecast service or
//! the grid sampler, and renders every failure as `{"error": <message>}`.

pub mod payload;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{error, info};

use crate::auth::{CredentialVerifier, StaticCredentials};
use crate::config::ServiceConfig;
use crate::forecast::ForecastService;
use crate::heatmap::GridSampler;
use crate::inference::ModelHandle;
use crate::models::{ForecastResult, Heatmap};
use crate::{ServiceError, VERSION};

use payload::{
    ErrorBody, ForecastRequest, HealthBody, HeatmapRequest, LoginRequest, MessageBody, VersionBody,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub forecast: Arc<ForecastService>,
    pub heatmap: Arc<GridSampler>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(
        handle: Arc<ModelHandle>,
        credentials: Arc<dyn CredentialVerifier>,
        grid_concurrency: usize,
    ) -> Self {
        let forecast = Arc::new(ForecastService::new(handle));
        let heatmap = Arc::new(GridSampler::with_concurrency(
            Arc::clone(&forecast),
            grid_concurrency,
        ));
        Self {
            forecast,
            heatmap,
            credentials,
        }
    }

    /// State wired from configuration, model loaded lazily
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            Arc::new(ModelHandle::from_artifact(config.model.artifact_path.clone())),
            Arc::new(StaticCredentials::from_config(&config.auth)),
            config.grid.concurrency,
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                ServiceError::validation(rejection.body_text())
            }
            other => ServiceError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/login", post(login))
        .route("/forecast", post(forecast))
        .route("/heatmap", post(heatmap))
        .with_state(state)
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "up".to_string(),
    })
}

async fn version() -> Json<VersionBody> {
    Json(VersionBody {
        version: VERSION.to_string(),
    })
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = payload?;

    let accepted = match (request.username.as_deref(), request.password.as_deref()) {
        (Some(username), Some(password)) => state.credentials.verify(username, password).await,
        _ => false,
    };

    if accepted {
        info!("Login succeeded");
        let body = MessageBody {
            message: "login success".to_string(),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    } else {
        info!("Login rejected");
        let body = ErrorBody {
            error: "invalid credentials".to_string(),
        };
        Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response())
    }
}

async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResult>, ServiceError> {
    let Json(request) = payload?;

    let result = state
        .forecast
        .run_forecast(request.lat, request.lon, &request.parameter())
        .await
        .inspect_err(|e| error!("Forecast error: {}", e))?;
    Ok(Json(result))
}

async fn heatmap(
    State(state): State<AppState>,
    payload: Result<Json<HeatmapRequest>, JsonRejection>,
) -> Result<Json<Heatmap>, ServiceError> {
    let Json(request) = payload?;

    let heatmap = state
        .heatmap
        .build_heatmap(request.lat, request.lon)
        .await?;
    Ok(Json(heatmap))
}
