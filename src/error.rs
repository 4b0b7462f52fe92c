use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::{CatalogError, GraphError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures surfaced by the binary: startup, the offline commands and serving.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("question catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("answer sheet error: {0}")]
    AnswerSheet(#[from] csv::Error),
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(_) | AppError::AnswerSheet(_) => StatusCode::BAD_REQUEST,
            AppError::Graph(_) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
