use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use epub_validator_core::{FailureReport, UploadError};
use thiserror::Error;

use crate::runner::RunError;

const TOOL_OUTPUT_FALLBACK: &str = "Error al validar el archivo";

/// Every way a `/validate` request can end without a report.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("validator did not finish within {0:?}")]
    Timeout(Duration),
    #[error("validator output is not a JSON report: {source}")]
    ToolOutput {
        stderr: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Internal(String),
}

impl From<RunError> for ValidateError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::TimedOut(limit) => Self::Timeout(limit),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl ValidateError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upload(UploadError::TooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upload(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::ToolOutput { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn report(&self) -> FailureReport {
        match self {
            Self::Upload(e) => FailureReport::new(e.category(), e.detail()),
            Self::Timeout(_) => {
                FailureReport::new("Validation timeout", "La validación tardó demasiado tiempo")
            }
            Self::ToolOutput { stderr, .. } => {
                let detail = if stderr.trim().is_empty() {
                    TOOL_OUTPUT_FALLBACK
                } else {
                    stderr.as_str()
                };
                FailureReport::new("EPUBCheck output parsing failed", detail)
            }
            Self::Internal(msg) => FailureReport::new(msg.as_str(), format!("Error interno: {msg}")),
        }
    }
}

impl IntoResponse for ValidateError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "validation failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "validation rejected");
        }
        (status, Json(self.report())).into_response()
    }
}
