use application::{ApplicationError, DocumentRepository, SearchEngine};
use async_trait::async_trait;
use domain::{Document, SearchRequest};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::criteria::matches_all;

/// Search engine that scans every stored document on each call.
/// No index or cache is kept; cost grows linearly with the store.
#[derive(Clone)]
pub struct InMemorySearchEngine {
    doc_repo: Arc<dyn DocumentRepository>,
}

impl InMemorySearchEngine {
    pub fn new(doc_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { doc_repo }
    }
}

#[async_trait]
impl SearchEngine for InMemorySearchEngine {
    #[instrument(skip(self, request))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        let candidates = self.doc_repo.list().await?;
        let scanned = candidates.len();

        let hits: Vec<Document> = candidates
            .into_iter()
            .filter(|doc| matches_all(doc, request))
            .collect();

        debug!(scanned, total_hits = hits.len(), "In-memory search finished.");
        Ok(hits)
    }
}
