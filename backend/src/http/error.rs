//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::models::UploadError;
use crate::services::{AnalysisError, SearchError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// An analysis for the same session is still running
    Conflict(String),
    /// Internal server error
    Internal(String),
    /// Language model failure
    Analysis(AnalysisError),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Analysis(e) => match e {
                AnalysisError::EmptyRequest => StatusCode::BAD_REQUEST,
                AnalysisError::MissingCredential | AnalysisError::Encoding(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AnalysisError::Transport(_)
                | AnalysisError::NoJsonObject
                | AnalysisError::InvalidJson(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
                RepositoryError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                RepositoryError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Conflict(_) => "ANALYSIS_IN_FLIGHT",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Analysis(e) => match e {
                AnalysisError::EmptyRequest => "EMPTY_REQUEST",
                AnalysisError::MissingCredential => "MISSING_CREDENTIAL",
                AnalysisError::Transport(_) => "AI_TRANSPORT_ERROR",
                AnalysisError::NoJsonObject | AnalysisError::InvalidJson(_) => {
                    "AI_RESPONSE_INVALID"
                }
                AnalysisError::Encoding(_) => "INTERNAL_ERROR",
            },
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => "NOT_FOUND",
                RepositoryError::ValidationError { .. } => "BAD_REQUEST",
                RepositoryError::InternalError { .. } => "REPOSITORY_ERROR",
            },
        }
    }

    fn message(self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Internal(msg) => msg,
            AppError::Analysis(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.message();
        if status.is_server_error() {
            error!(code, "{}", message);
        }
        (status, Json(ApiError::new(code, message))).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoDeviceSelected => AppError::BadRequest(err.to_string()),
            SearchError::Csv(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
