// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, DocumentRepository};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use domain::{Document, DocumentId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

/// In-memory document store: the identifier counter plus the id -> document map.
///
/// Clones share the same underlying state. Every generated identifier comes
/// from a single atomic increment, so concurrent saves of new documents always
/// receive distinct identifiers.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    store: Arc<DashMap<DocumentId, Arc<Document>>>,
    // Next identifier to hand out
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Takes the next counter value as a decimal identifier.
    fn generate_id(&self) -> DocumentId {
        DocumentId::new(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    async fn save(&self, mut document: Document) -> Result<Document, ApplicationError> {
        if document.created.is_none() {
            document.created = Some(Utc::now());
        }

        let id = match document.id().cloned() {
            Some(id) => id,
            None => self.generate_id(),
        };
        document.id = Some(id.clone());

        // Full replacement, no field-level merge
        self.store.insert(id, Arc::new(document.clone()));
        debug!(doc_id = ?document.id, "Saved document to in-memory store");
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        let doc = self.store.get(id).map(|doc_ref| (**doc_ref).clone());
        Ok(doc)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Document>, ApplicationError> {
        let docs: Vec<Document> = self
            .store
            .iter()
            .map(|entry| (**entry.value()).clone())
            .collect();
        debug!(count = docs.len(), "Listed documents from in-memory store");
        Ok(docs)
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::Author;
    use std::collections::HashSet;

    fn doc(title: &str, content: &str, author_id: &str) -> Document {
        Document::new(title, content, Author::new(author_id, "Someone"))
    }

    fn id_of(doc: &Document) -> &str {
        doc.id().map(DocumentId::as_str).expect("saved document has an id")
    }

    #[tokio::test]
    async fn assigns_sequential_ids_from_one() {
        let repo = InMemoryDocumentRepository::new();
        for expected in ["1", "2", "3"] {
            let saved = repo.save(doc("t", "c", "a1")).await.unwrap();
            assert_eq!(id_of(&saved), expected);
        }
    }

    #[tokio::test]
    async fn empty_id_gets_generated() {
        let repo = InMemoryDocumentRepository::new();
        let saved = repo.save(doc("t", "c", "a1").with_id("")).await.unwrap();
        assert_eq!(id_of(&saved), "1");
        assert!(repo.get(&DocumentId::from("")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn assigns_created_at_or_after_call() {
        let repo = InMemoryDocumentRepository::new();
        let before = Utc::now();
        let saved = repo.save(doc("t", "c", "a1")).await.unwrap();
        let created = saved.created.expect("created is populated");
        assert!(created >= before);
        assert!(created <= Utc::now());
    }

    #[tokio::test]
    async fn keeps_supplied_created_and_id() {
        let repo = InMemoryDocumentRepository::new();
        let created = Utc::now() - Duration::days(3);
        let saved = repo
            .save(doc("t", "c", "a1").with_id("custom").with_created(created))
            .await
            .unwrap();
        assert_eq!(id_of(&saved), "custom");
        assert_eq!(saved.created, Some(created));

        // A caller-chosen id does not consume the counter
        let next = repo.save(doc("t", "c", "a1")).await.unwrap();
        assert_eq!(id_of(&next), "1");
    }

    #[tokio::test]
    async fn update_replaces_whole_document() {
        let repo = InMemoryDocumentRepository::new();
        let original = repo.save(doc("Old title", "old body", "a1")).await.unwrap();

        let replacement = Document {
            author: None,
            ..doc("New title", "new body", "a1")
        }
        .with_id(id_of(&original));
        let saved = repo.save(replacement).await.unwrap();

        let stored = repo
            .get(&DocumentId::from("1"))
            .await
            .unwrap()
            .expect("document is stored");
        assert_eq!(stored, saved);
        assert_eq!(stored.title, "New title");
        assert_eq!(stored.content, "new body");
        assert!(stored.author.is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn generated_id_overwrites_caller_chosen_one() {
        let repo = InMemoryDocumentRepository::new();
        repo.save(doc("manual", "", "a1").with_id("1")).await.unwrap();

        let generated = repo.save(doc("auto", "", "a1")).await.unwrap();
        assert_eq!(id_of(&generated), "1");

        let stored = repo.get(&DocumentId::from("1")).await.unwrap().unwrap();
        assert_eq!(stored.title, "auto");
        assert_eq!(repo.count().await.unwrap(), 1);

        // One increment per generated id
        let next = repo.save(doc("auto", "", "a1")).await.unwrap();
        assert_eq!(id_of(&next), "2");
        assert_eq!(repo.next_id.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let repo = InMemoryDocumentRepository::new();
        repo.save(doc("t", "c", "a1")).await.unwrap();
        assert!(repo.get(&DocumentId::from("99")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = InMemoryDocumentRepository::new();
        let clone = repo.clone();
        clone.save(doc("t", "c", "a1")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        let next = repo.save(doc("t", "c", "a1")).await.unwrap();
        assert_eq!(id_of(&next), "2");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_get_unique_ids() {
        let repo = InMemoryDocumentRepository::new();
        let mut handles = Vec::new();
        for task in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for n in 0..25 {
                    let saved = repo
                        .save(doc(&format!("task {task} doc {n}"), "", "a1"))
                        .await
                        .unwrap();
                    ids.push(id_of(&saved).to_string());
                }
                ids
            }));
        }

        let mut all_ids = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(all_ids.insert(id), "identifier handed out twice");
            }
        }
        assert_eq!(all_ids.len(), 200);
        assert_eq!(repo.count().await.unwrap(), 200);
        let expected: HashSet<String> = (1..=200).map(|n| n.to_string()).collect();
        assert_eq!(all_ids, expected);
    }
}
