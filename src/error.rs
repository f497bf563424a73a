use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 拉取发票失败的原因
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No invoice found for order {0}")]
    NotFound(String),

    #[error("Invoice service responded with status {0}")]
    Upstream(u16),

    #[error("Invoice request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invoice payload malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 失败类别 (视图状态里只保留类别和文案)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Upstream,
    Transport,
    Malformed,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::NotFound(_) => FailureKind::NotFound,
            FetchError::Upstream(_) => FailureKind::Upstream,
            FetchError::Transport(_) => FailureKind::Transport,
            FetchError::Malformed(_) => FailureKind::Malformed,
        }
    }
}

/// 应用级错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("Invalid upstream base URL: {0}")]
    BaseUrl(String),

    #[error("HTTP client error: {0}")]
    Client(reqwest::Error),
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch(FetchError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let response = ErrorResponse {
            success: false,
            message: self.to_string(),
        };
        (status, Json(response)).into_response()
    }
}
