//! Error types and handling for the forecast service

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the forecast service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Model artifact could not be located or deserialized
    #[error("Model load error: {message}")]
    Load { message: String },

    /// Single-point inference failed
    #[error("Forecast error: {message}")]
    Forecast { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Request bodies refused before they could be read
    #[error("Request rejected: {message}")]
    Rejected { status: StatusCode, message: String },
}

impl ServiceError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new model load error
    pub fn load<S: Into<String>>(message: S) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Create a new forecast error
    pub fn forecast<S: Into<String>>(message: S) -> Self {
        Self::Forecast {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status the gateway answers with for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Config { .. }
            | ServiceError::Load { .. }
            | ServiceError::Forecast { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Rejected { status, .. } => *status,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ServiceError::Load { message } => format!("Model unavailable: {message}"),
            ServiceError::Forecast { message } => message.clone(),
            ServiceError::Validation { message } => format!("Invalid input: {message}"),
            ServiceError::Rejected { message, .. } => message.clone(),
        }
    }
}
