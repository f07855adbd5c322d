//! HTTP upload service around the processing pipeline.
//!
//! Routes:
//! - `GET /` and `GET /bongo-cat`: service banners
//! - `GET /bongo-cat/stats`: [`StatsSnapshot`] as JSON
//! - `POST /bongo-cat/process-photo`: multipart upload (field `photo`), returns the GIF URL
//! - `GET /ui`: `public_dir/index.html`
//! - anything else: static files from `public_dir`, then a JSON 404

pub mod stats;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::{config::BongoConfig, foundation::error::BongoResult, pipeline::process_bytes_to_path};

pub use stats::{ProcessingStats, StatsSnapshot};

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Subdirectory of `public_dir` receiving generated GIFs.
pub const GENERATED_DIR: &str = "generated";

/// HTTP service settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Root for static files; generated GIFs land in `public_dir/generated`.
    pub public_dir: PathBuf,
    /// Maximum accepted request body size.
    pub max_upload_bytes: usize,
    /// Settings applied to every upload.
    pub processing: BongoConfig,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            public_dir: public_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            processing: BongoConfig::default(),
        }
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.public_dir.join(GENERATED_DIR)
    }
}

#[derive(Clone)]
struct AppState {
    cfg: Arc<ServerConfig>,
    stats: Arc<ProcessingStats>,
}

/// Build the service router. `stats` is shared so callers can observe it.
pub fn router(cfg: ServerConfig, stats: Arc<ProcessingStats>) -> Router {
    let static_files =
        ServeDir::new(&cfg.public_dir).not_found_service(not_found.into_service());
    let limit = cfg.max_upload_bytes;
    let state = AppState {
        cfg: Arc::new(cfg),
        stats,
    };

    Router::new()
        .route("/", get(index))
        .route("/bongo-cat", get(banner))
        .route("/bongo-cat/stats", get(get_stats))
        .route("/bongo-cat/process-photo", post(process_photo))
        .route("/ui", get(ui))
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Bind `cfg.addr` and serve until Ctrl-C.
pub async fn serve(cfg: ServerConfig) -> BongoResult<()> {
    let addr = cfg.addr;
    let generated = cfg.generated_dir();
    tokio::fs::create_dir_all(&generated)
        .await
        .with_context(|| format!("create output directory '{}'", generated.display()))?;

    let app = router(cfg, Arc::new(ProcessingStats::new()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "bongo cat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;
    info!("server closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("shutdown signal received, shutting down gracefully");
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the Bongo Cat Photo Processing App!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/bongo-cat", "/bongo-cat/stats", "/bongo-cat/process-photo", "/ui"],
    }))
}

async fn banner() -> Json<serde_json::Value> {
    Json(json!({
        "message": "BONGO CAT PHOTO PROCESSOR",
        "description": "Upload images to turn them into animated Bongo Cat GIFs!",
    }))
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

async fn ui(State(state): State<AppState>) -> Response {
    let path = state.cfg.public_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "UI not found",
                "message": "The interface file is missing!",
            })),
        )
            .into_response(),
    }
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested endpoint does not exist",
        })),
    )
}

struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

async fn process_photo(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_photo(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return failure(StatusCode::BAD_REQUEST, "No photo uploaded", None),
        Err(resp) => return resp,
    };
    info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        size = upload.bytes.len(),
        "photo processing started"
    );

    let gif_name = unique_gif_name();
    let out_path = state.cfg.generated_dir().join(&gif_name);
    let job_path = out_path.clone();
    let processing = state.cfg.processing.clone();
    let joined = tokio::task::spawn_blocking(move || {
        process_bytes_to_path(&upload.bytes, &job_path, &processing)
    })
    .await;

    match joined {
        Ok(Ok(report)) => {
            let total = state.stats.record_success();
            let gif_url = format!("/{GENERATED_DIR}/{gif_name}");
            info!(%gif_url, frames = report.frame_count, total, "photo processing completed");
            Json(json!({
                "success": true,
                "gifUrl": gif_url,
                "message": "BONGO CAT ARMS ADDED SUCCESSFULLY!",
            }))
            .into_response()
        }
        Ok(Err(e)) => {
            discard_partial(&out_path).await;
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            warn!(error = %e, %status, "photo processing failed");
            failure(status, "Failed to process photo", Some(e.to_string()))
        }
        Err(e) => {
            discard_partial(&out_path).await;
            error!(error = %e, "photo processing task panicked");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process photo",
                Some(e.to_string()),
            )
        }
    }
}

async fn read_photo(multipart: &mut Multipart) -> Result<Option<Upload>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(failure(e.status(), "Invalid upload", Some(e.body_text()))),
        };
        if field.name() != Some("photo") {
            continue;
        }

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(failure(
                StatusCode::BAD_REQUEST,
                "Only image files are allowed!",
                None,
            ));
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| failure(e.status(), "Invalid upload", Some(e.body_text())))?;
        return Ok(Some(Upload { file_name, bytes }));
    }
}

fn failure(status: StatusCode, error: &str, message: Option<String>) -> Response {
    let mut body = json!({ "success": false, "error": error });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    (status, Json(body)).into_response()
}

async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}

/// `bongo-cat-<unix millis>-<random>.gif`, unique across concurrent requests.
fn unique_gif_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("bongo-cat-{millis}-{:08x}.gif", rand::random::<u32>())
}

#[cfg(test)]
#[path = "../../tests/unit/server/mod.rs"]
mod tests;
