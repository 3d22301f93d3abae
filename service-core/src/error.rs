use crate::flow::FlowError;
use crate::report::{ReportError, ReportRequestValidationError};
use crate::validation::AggregatedValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    FlowValidation(#[from] AggregatedValidationError),

    #[error(transparent)]
    ReportRequest(#[from] ReportRequestValidationError),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl<E: Into<AppError>> From<FlowError<E>> for AppError {
    fn from(err: FlowError<E>) -> Self {
        match err {
            FlowError::Rejected(rejection) => AppError::FlowValidation(rejection),
            FlowError::Operation(inner) => inner.into(),
        }
    }
}

impl<E: Into<AppError>> From<ReportError<E>> for AppError {
    fn from(err: ReportError<E>) -> Self {
        match err {
            ReportError::InvalidRequest(invalid) => AppError::ReportRequest(invalid),
            ReportError::Rejected(rejection) => AppError::FlowValidation(rejection),
            ReportError::Provider(inner) => inner.into(),
            ReportError::RowMapping { row_index, source } => AppError::InternalError(
                anyhow::Error::new(source).context(format!("Report row {} has wrong shape", row_index)),
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationErrorEntry {
    property: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            validation_errors: Option<Vec<ValidationErrorEntry>>,
        }

        let (status, error_message, details, validation_errors) = match self {
            AppError::FlowValidation(err) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                None,
                Some(
                    err.into_failures()
                        .into_iter()
                        .map(|f| ValidationErrorEntry {
                            property: f.field_key,
                            message: f.message,
                        })
                        .collect(),
                ),
            ),
            AppError::ReportRequest(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), None, None)
            }
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None, None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None, None),
            AppError::Conflict(err) => (StatusCode::CONFLICT, err.to_string(), None, None),
            AppError::InternalError(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                    None,
                )
            }
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                    None,
                )
            }
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
                None,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
                validation_errors,
            }),
        )
            .into_response()
    }
}
