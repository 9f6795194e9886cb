//! Per-criterion document predicates.
//!
//! Each function answers one dimension of a [`SearchRequest`]. An absent or
//! empty list, or an absent bound, is vacuously satisfied. A document field
//! that is missing (no author, no creation time) never satisfies a criterion
//! that actually constrains it.

use chrono::{DateTime, Utc};
use domain::{Document, SearchRequest};
use tracing::trace;

/// Title starts with at least one of `prefixes`.
pub fn matches_title_prefixes(doc: &Document, prefixes: Option<&[String]>) -> bool {
    match prefixes {
        None | Some([]) => true,
        Some(prefixes) => prefixes
            .iter()
            .any(|prefix| doc.title.starts_with(prefix.as_str())),
    }
}

/// Content contains every one of `contents`.
pub fn matches_contains_contents(doc: &Document, contents: Option<&[String]>) -> bool {
    match contents {
        None | Some([]) => true,
        Some(contents) => contents
            .iter()
            .all(|needle| doc.content.contains(needle.as_str())),
    }
}

/// Author id is one of `author_ids`.
pub fn matches_author_ids(doc: &Document, author_ids: Option<&[String]>) -> bool {
    match author_ids {
        None | Some([]) => true,
        Some(author_ids) => doc
            .author_id()
            .is_some_and(|author_id| author_ids.iter().any(|id| id == author_id)),
    }
}

/// `created` lies within `[from, to]`, each bound optional.
pub fn matches_created_range(
    doc: &Document,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(created) = doc.created else {
        return false;
    };
    from.is_none_or(|from| created >= from) && to.is_none_or(|to| created <= to)
}

/// All four criteria hold.
pub fn matches_all(doc: &Document, request: &SearchRequest) -> bool {
    let matched = matches_title_prefixes(doc, request.title_prefixes.as_deref())
        && matches_contains_contents(doc, request.contains_contents.as_deref())
        && matches_author_ids(doc, request.author_ids.as_deref())
        && matches_created_range(doc, request.created_from, request.created_to);
    trace!(doc_id = ?doc.id, matched, "Evaluated search criteria");
    matched
}
