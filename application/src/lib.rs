use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Author, Document, DocumentId, SearchRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

// --- Infrastructure Interfaces (Traits) ---

/// The document store. Saving is the only mutating operation.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts or fully replaces a document, assigning an identifier and a
    /// creation time when they are missing. Returns the stored document.
    async fn save(&self, document: Document) -> Result<Document, ApplicationError>;
    /// Retrieves a document by its ID. `Ok(None)` when nothing is stored under it.
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Snapshot of every stored document, in no particular order.
    async fn list(&self) -> Result<Vec<Document>, ApplicationError>;
    /// Number of stored documents.
    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.list().await?.len())
    }
}

/// Multi-criterion search over the documents currently in a store.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Returns every stored document matching all supplied criteria.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError>;
}

// --- Request/Response Models (Data Transfer Objects - DTOs) ---

/// Request to save (create or replace) a document.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SaveDocumentRequest {
    /// Present when updating an existing document.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl From<SaveDocumentRequest> for Document {
    fn from(request: SaveDocumentRequest) -> Self {
        Document {
            id: request.id.map(DocumentId::new),
            title: request.title,
            content: request.content,
            author: request.author,
            created: request.created,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct SearchResponse {
    /// Every matching document, unordered.
    pub hits: Vec<Document>,
    /// Number of matching documents.
    pub nb_hits: usize,
    /// Time taken by the search operation in milliseconds.
    pub processing_time_ms: u128,
}

/// Response for the /stats endpoint.
#[derive(Serialize, Debug)]
pub struct StatsResponse {
    total_documents: usize,
}

// --- Application Services (Use Cases) ---

/// Service exposing save, lookup and search over documents.
pub struct DocumentService {
    doc_repo: Arc<dyn DocumentRepository>,
    search_engine: Arc<dyn SearchEngine>,
}

impl DocumentService {
    pub fn new(doc_repo: Arc<dyn DocumentRepository>, search_engine: Arc<dyn SearchEngine>) -> Self {
        Self {
            doc_repo,
            search_engine,
        }
    }

    #[instrument(skip(self, request), fields(doc_id = ?request.id))]
    pub async fn save(&self, request: SaveDocumentRequest) -> Result<Document, ApplicationError> {
        info!("Attempting to save document");
        let document = self.doc_repo.save(request.into()).await.map_err(|e| {
            error!("Failed to save document to repository: {}", e);
            e
        })?;
        info!(doc_id = ?document.id, "Document saved successfully");
        Ok(document)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, ApplicationError> {
        debug!("Looking up document");
        self.doc_repo.get(&DocumentId::new(id.to_string())).await
    }

    /// Like [`find_by_id`](Self::find_by_id), but absence is an error.
    pub async fn get_document(&self, id: &str) -> Result<Document, ApplicationError> {
        self.find_by_id(id).await?.ok_or_else(|| {
            warn!(doc_id = %id, "Document not found");
            ApplicationError::NotFound(id.to_string())
        })
    }

    #[instrument(skip(self, request))]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, ApplicationError> {
        info!(unconstrained = request.is_unconstrained(), "Attempting to search documents");
        let start_time = Instant::now();

        if let (Some(from), Some(to)) = (request.created_from, request.created_to) {
            if from > to {
                // Still a valid request; it simply matches nothing.
                warn!(%from, %to, "Search created range is empty");
            }
        }

        let hits = self.search_engine.search(&request).await.map_err(|e| {
            error!(time_ms = start_time.elapsed().as_millis(), "Search failed: {}", e);
            e
        })?;
        let processing_time_ms = start_time.elapsed().as_millis();
        info!(
            total_hits = hits.len(),
            time_ms = processing_time_ms,
            "Search successful"
        );

        Ok(SearchResponse {
            nb_hits: hits.len(),
            hits,
            processing_time_ms,
        })
    }
}

pub struct StatsService {
    doc_repo: Arc<dyn DocumentRepository>,
}

impl StatsService {
    pub fn new(doc_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { doc_repo }
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<StatsResponse, ApplicationError> {
        info!("Gathering engine statistics");
        let total_documents = self.doc_repo.count().await.map_err(|e| {
            error!("Failed to get total document count for stats: {}", e);
            ApplicationError::InfrastructureError("Failed to retrieve document count".to_string())
        })?;
        debug!(total_documents, "Engine stats gathered");
        Ok(StatsResponse { total_documents })
    }
}
