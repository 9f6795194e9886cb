use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// Opaque author data referenced by documents. No uniqueness is enforced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// --- Document ---

/// A stored document.
///
/// `id` and `created` are `None` until the document has been saved; the store
/// fills in whichever of them is missing. A missing title or content
/// deserializes to an empty string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an unsaved document (no identifier, no creation time).
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author: Some(author),
            created: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// The identifier, treating an empty one as absent.
    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref().filter(|id| !id.is_empty())
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().map(|author| author.id.as_str())
    }
}

// --- Search Request ---

/// Optional filter criteria. An absent or empty list, or an absent bound,
/// places no constraint on the result.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Title must start with at least one of these.
    #[serde(default)]
    pub title_prefixes: Option<Vec<String>>,
    /// Content must contain every one of these.
    #[serde(default)]
    pub contains_contents: Option<Vec<String>>,
    /// Author id must be one of these.
    #[serde(default)]
    pub author_ids: Option<Vec<String>>,
    /// Inclusive lower bound on `created`.
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created`.
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn title_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.title_prefixes = Some(to_owned_vec(prefixes));
        self
    }

    pub fn contains_contents(mut self, contents: &[&str]) -> Self {
        self.contains_contents = Some(to_owned_vec(contents));
        self
    }

    pub fn author_ids(mut self, ids: &[&str]) -> Self {
        self.author_ids = Some(to_owned_vec(ids));
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// True when no criterion constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        is_empty_list(&self.title_prefixes)
            && is_empty_list(&self.contains_contents)
            && is_empty_list(&self.author_ids)
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

fn to_owned_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn is_empty_list(list: &Option<Vec<String>>) -> bool {
    list.as_ref().is_none_or(|values| values.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_id_is_treated_as_absent() {
        let doc = Document::new("t", "c", Author::new("a1", "Ann")).with_id("");
        assert!(doc.id.is_some());
        assert!(doc.id().is_none());

        let doc = doc.with_id("7");
        assert_eq!(doc.id().map(DocumentId::as_str), Some("7"));
    }

    #[test]
    fn document_deserializes_with_missing_fields() {
        let doc: Document = serde_json::from_value(json!({ "title": "Report A" }))
            .expect("document should deserialize");
        assert_eq!(doc.title, "Report A");
        assert_eq!(doc.content, "");
        assert!(doc.id.is_none());
        assert!(doc.author.is_none());
        assert!(doc.created.is_none());
    }

    #[test]
    fn search_request_uses_camel_case_fields() {
        let request: SearchRequest = serde_json::from_value(json!({
            "titlePrefixes": ["Report"],
            "authorIds": ["a1", "a2"],
            "createdFrom": "2024-01-01T00:00:00Z"
        }))
        .expect("request should deserialize");
        assert_eq!(request.title_prefixes, Some(vec!["Report".to_string()]));
        assert_eq!(request.author_ids.as_ref().map(Vec::len), Some(2));
        assert!(request.contains_contents.is_none());
        assert!(request.created_from.is_some());
        assert!(request.created_to.is_none());
    }

    #[test]
    fn unconstrained_request_detection() {
        assert!(SearchRequest::default().is_unconstrained());
        assert!(SearchRequest::default().title_prefixes(&[]).is_unconstrained());
        assert!(!SearchRequest::default().author_ids(&["a1"]).is_unconstrained());
        assert!(!SearchRequest::default().created_to(Utc::now()).is_unconstrained());
    }
}
