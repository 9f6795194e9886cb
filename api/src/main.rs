// ./api/src/main.rs
mod config;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as JsonResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::{ApplicationError, DocumentService, SaveDocumentRequest, StatsService};
use domain::SearchRequest;
use infrastructure::{InMemoryDocumentRepository, InMemorySearchEngine};

use config::ServerConfig;

#[derive(Clone)]
struct AppState {
    document_service: Arc<DocumentService>,
    stats_service: Arc<StatsService>,
}

/// Wires one in-memory store into every service.
fn build_state() -> AppState {
    // One store per process, shared by every consumer
    let document_repository = Arc::new(InMemoryDocumentRepository::new());
    let search_engine = Arc::new(InMemorySearchEngine::new(document_repository.clone()));
    info!("In-memory infrastructure components initialized.");

    let document_service = Arc::new(DocumentService::new(
        document_repository.clone(),
        search_engine,
    ));
    let stats_service = Arc::new(StatsService::new(document_repository));
    info!("Application services initialized.");

    AppState {
        document_service,
        stats_service,
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats_handler))
        .route("/documents", post(save_document_handler))
        .route("/documents/search", post(search_documents_handler))
        .route("/documents/:doc_id", get(get_document_handler))
        .with_state(state)
}

// Application entry point
#[tokio::main]
async fn main() {
    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
    info!("Logger initialized successfully.");

    let config = ServerConfig::from_env();

    let app = router(build_state());
    info!("API routes configured.");

    // --- Server Startup ---
    let addr = config.addr();
    info!("Server starting on {}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

// --- API Handlers ---

async fn health_check() -> impl IntoResponse {
    info!("Health check endpoint called");
    (StatusCode::OK, "OK")
}

/// Handler for saving a document (POST /documents).
async fn save_document_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveDocumentRequest>,
) -> Response {
    info!(doc_id = ?payload.id, "Received request to save document");
    match state.document_service.save(payload).await {
        Ok(document) => (StatusCode::OK, JsonResponse(document)).into_response(),
        Err(e) => {
            error!("Failed to save document via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for fetching a document (GET /documents/:doc_id).
async fn get_document_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Response {
    info!(doc_id = %doc_id, "Received request to get document");
    match state.document_service.get_document(&doc_id).await {
        Ok(document) => (StatusCode::OK, JsonResponse(document)).into_response(),
        Err(e) => map_application_error_to_response(e),
    }
}

/// Handler for searching documents (POST /documents/search).
async fn search_documents_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    info!(
        unconstrained = request.is_unconstrained(),
        "Received search request via POST"
    );
    match state.document_service.search(request).await {
        Ok(response) => {
            info!("Search completed successfully via handler, {} total hits", response.nb_hits);
            (StatusCode::OK, JsonResponse(response)).into_response()
        }
        Err(e) => {
            error!("Failed to search documents via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

async fn get_stats_handler(State(state): State<AppState>) -> Response {
    info!("Received request to get statistics");
    match state.stats_service.get_stats().await {
        Ok(stats_response) => (StatusCode::OK, JsonResponse(stats_response)).into_response(),
        Err(e) => {
            error!("Failed to get statistics via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Maps ApplicationError to an HTTP status code and JSON error body.
fn map_application_error_to_response(err: ApplicationError) -> Response {
    let (status, message) = match err {
        ApplicationError::NotFound(id) => {
            warn!(doc_id = %id, "Document not found");
            (StatusCode::NOT_FOUND, format!("Document '{}' not found", id))
        }
        ApplicationError::InfrastructureError(msg) => {
            error!("Underlying infrastructure error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
            )
        }
    };
    (status, JsonResponse(json!({ "error": message }))).into_response()
}
