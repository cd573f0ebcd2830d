//! JSON HTTP server for documents.
//!
//! A thin adapter over [`DocumentService`]. Store calls block on disk I/O,
//! so every handler runs them on tokio's blocking pool.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST`  | `/documents` | Create a document (201) |
//! | `GET`   | `/documents` | List summaries, most recently updated first |
//! | `GET`   | `/documents/{id}` | Fetch a full document |
//! | `PATCH` | `/documents/{id}` | Update title and/or content |
//! | `GET`   | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "document not found: document_abc" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! Internal failures are logged with their cause and reported generically.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use docstore_core::{Document, DocumentSummary, StoreError, StoreResult};

use crate::config::Config;
use crate::file_store::FileStore;
use crate::service::{DocumentPatch, DocumentService, NewDocument};

/// Starts the HTTP server.
///
/// Opens the file store at `[storage].path`, binds to `[server].bind`, and
/// serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = FileStore::open(&config.storage.path)?;
    let service = DocumentService::new(Arc::new(store));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        storage = %config.storage.path.display(),
        "docstore server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all document routes. Exposed for tests and for
/// embedding in a larger application.
pub fn router(service: DocumentService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/documents", get(handle_list).post(handle_create))
        .route("/documents/{id}", get(handle_get).patch(handle_update))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal() -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: "internal server error".to_string(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => bad_request(msg),
            StoreError::NotFound(_) => not_found(err.to_string()),
            StoreError::Storage { .. } => {
                tracing::error!(error = ?err, "storage failure");
                internal()
            }
        }
    }
}

/// Run a blocking store call off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => {
            tracing::error!(error = %e, "blocking store task failed");
            Err(internal())
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /documents ============

async fn handle_create(
    State(service): State<DocumentService>,
    Json(payload): Json<NewDocument>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let doc = blocking(move || service.create(payload)).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

async fn handle_list(
    State(service): State<DocumentService>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    let summaries = blocking(move || service.list()).await?;
    Ok(Json(summaries))
}

async fn handle_get(
    State(service): State<DocumentService>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let doc = blocking(move || service.get(&id)).await?;
    Ok(Json(doc))
}

async fn handle_update(
    State(service): State<DocumentService>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<Document>, AppError> {
    let doc = blocking(move || service.update(&id, patch)).await?;
    Ok(Json(doc))
}
