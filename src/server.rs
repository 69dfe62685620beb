//! HTTP front-end: upload a quadrat photo, get coverage and overlays back.

mod handlers;
mod storage;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::image_pipeline::{PngBase64Encoder, SeagrassPipeline, StandardImageReader};

pub use handlers::{ErrorResponse, HealthResponse};
pub use storage::{sanitize_filename, StorageDirs};

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub type StandardPipeline = SeagrassPipeline<StandardImageReader, PngBase64Encoder>;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<StandardPipeline>,
    storage: Arc<StorageDirs>,
}

impl AppState {
    pub fn new(pipeline: StandardPipeline, storage: StorageDirs) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            storage: Arc::new(storage),
        }
    }

    pub fn pipeline(&self) -> &StandardPipeline {
        &self.pipeline
    }

    pub fn storage(&self) -> &StorageDirs {
        &self.storage
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %listener.local_addr()?,
        uploads = %state.storage().uploads().display(),
        outputs = %state.storage().outputs().display(),
        "Seagrass analysis server listening"
    );

    axum::serve(listener, router(state))
        .await
        .context("server terminated")?;
    Ok(())
}
