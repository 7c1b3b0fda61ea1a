use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use isochrone_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// Startup failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("No graph snapshot given; set [graph] snapshot or pass --snapshot")]
    MissingSnapshot,
    #[error("Failed to build road graph: {0}")]
    Graph(#[from] CoreError),
    #[error("Graph loading task failed: {0}")]
    Loader(#[from] tokio::task::JoinError),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Request failures, rendered as `{ "error": kind, "message": text }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Failed to encode response: {0}")]
    Encoding(String),
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Core(
                CoreError::OutOfNetwork { .. }
                | CoreError::NoPointsFound
                | CoreError::InsufficientPoints { .. }
                | CoreError::UnreachableNode(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(CoreError::DeadlineExceeded { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Core(_) | ApiError::Encoding(_) | ApiError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Core(err) => match err {
                CoreError::OutOfNetwork { .. } => "out_of_network",
                CoreError::NoPointsFound => "no_points_found",
                CoreError::InvalidBudget(_) => "invalid_budget",
                CoreError::InvalidCoordinate { .. } => "invalid_coordinate",
                CoreError::InvalidAlpha(_) => "invalid_alpha",
                CoreError::InsufficientPoints { .. } => "insufficient_points",
                CoreError::UnreachableNode(_) => "unreachable_node",
                CoreError::DeadlineExceeded { .. } => "deadline_exceeded",
                CoreError::InvalidData(_) => "invalid_request",
            },
            ApiError::Encoding(_) => "encoding",
            ApiError::Worker(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("Rejected request: {self}");
        }

        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let ApiError::Core(CoreError::InsufficientPoints { points }) = &self {
            body["points"] = points.iter().map(|c| json!([c.x, c.y])).collect();
        }

        (status, Json(body)).into_response()
    }
}
