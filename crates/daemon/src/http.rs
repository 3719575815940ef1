use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use epub_validator_core::{
    screen_filename, StatusDocument, ToolReport, UploadError, ValidationReport,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::{config::DaemonConfig, error::ValidateError, runner, upload::ScopedUpload};

const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    config: Arc<DaemonConfig>,
}

pub fn router(config: DaemonConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/", get(status))
        .route("/validate", post(validate))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status() -> Json<StatusDocument> {
    Json(StatusDocument::default())
}

async fn validate(
    State(st): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ValidationReport>, ValidateError> {
    let multipart = multipart.map_err(|e| {
        debug!(error = %e, "request is not multipart");
        UploadError::MissingFile
    })?;
    let upload = read_upload(multipart).await?;
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "validating upload");

    let file = ScopedUpload::write(&st.config.temp_dir, upload.bytes)
        .await
        .map_err(|e| ValidateError::Internal(format!("failed to store upload: {e}")))?;
    let output = runner::run(&st.config.validator, file.path(), st.config.timeout).await?;
    drop(file);

    let tool = ToolReport::parse(&output.stdout).map_err(|source| ValidateError::ToolOutput {
        stderr: output.stderr,
        source,
    })?;
    let report = ValidationReport::from_tool(&tool);

    info!(
        filename = %upload.filename,
        valid = report.is_valid(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        fatals = report.fatals.len(),
        version = %report.version,
        elapsed_ms = output.elapsed.as_millis() as u64,
        "validation finished"
    );
    Ok(Json(report))
}

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// Pulls the single `file` part out of the body. Non-file parts and parts
/// with other names are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, UploadError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(name) = field.file_name() else {
            continue;
        };
        if upload.is_some() {
            return Err(UploadError::MultipleFiles);
        }
        let filename = screen_filename(Some(name))?.to_owned();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(Upload { filename, bytes });
    }

    upload.ok_or(UploadError::MissingFile)
}

fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Malformed(err.body_text())
    }
}
