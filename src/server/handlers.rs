use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{sanitize_filename, AppState, StandardPipeline, StorageDirs};
use crate::image_pipeline::{AnalysisError, AnalysisResult};

const NO_FILE_UPLOADED: &str = "No file uploaded";
const EMPTY_FILENAME: &str = "Empty filename";
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error reply carrying a status code and a message for the `error` field.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        if err.is_input_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub(crate) async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    info!(filename = %upload.filename, bytes = upload.data.len(), "Upload received");

    let pipeline = state.pipeline.clone();
    let storage = state.storage.clone();
    let result = tokio::task::spawn_blocking(move || process_upload(&pipeline, &storage, upload))
        .await
        .map_err(|e| ApiError::internal(format!("analysis task failed: {e}")))??;

    Ok(Json(result))
}

struct Upload {
    filename: String,
    data: Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // a form field without a filename is not a file upload
        let Some(filename) = field.file_name().map(str::to_owned) else {
            return Err(ApiError::bad_request(NO_FILE_UPLOADED));
        };
        if filename.is_empty() {
            return Err(ApiError::bad_request(EMPTY_FILENAME));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        return Ok(Upload { filename, data });
    }
    Err(ApiError::bad_request(NO_FILE_UPLOADED))
}

fn process_upload(
    pipeline: &StandardPipeline,
    storage: &StorageDirs,
    upload: Upload,
) -> Result<AnalysisResult, ApiError> {
    let filename = sanitize_filename(&upload.filename);
    let saved = storage.save_upload(&filename, &upload.data)?;
    debug!(path = %saved.display(), "Upload stored");

    // analysis reads this request's bytes, never the stored copy
    let result = pipeline.analyze(&upload.data)?;
    storage.save_overlays(&filename, &result)?;
    Ok(result)
}
