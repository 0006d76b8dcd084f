use crate::types::{ContentEntry, Hit, SearchOptions};

/// The retrieval surface the rest of the application depends on.
///
/// Implementations never fail: a missing or unreadable index presents as no
/// results.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, options: &SearchOptions) -> Vec<Hit>;

    /// Distinct indexed documents, skipping the given categories.
    fn content_index(&self, exclude_categories: &[String]) -> Vec<ContentEntry>;
}
