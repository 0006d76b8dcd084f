use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

use sitesearch_core::error::{Error, Result};
use sitesearch_core::tokenize;
use sitesearch_core::traits::Retriever;
use sitesearch_core::types::{round6, ContentEntry, DocumentChunk, Hit, IndexSnapshot, SearchOptions};
use sitesearch_core::vector::{idf_table, SparseVector};

use crate::similarity::{cosine, sparse_dot};

const ELLIPSIS: char = '…';

/// An immutable, loaded snapshot plus the lookup tables queries need.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    snapshot: IndexSnapshot,
    term_ids: HashMap<String, u32>,
    idf: Vec<f64>,
}

impl QueryEngine {
    /// Wrap an in-memory snapshot. Rejects snapshots whose vectors do not line
    /// up with the vocabulary.
    pub fn new(snapshot: IndexSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self::from_validated(snapshot))
    }

    fn from_validated(snapshot: IndexSnapshot) -> Self {
        let term_ids = snapshot.vocabulary.iter().enumerate().map(|(i, t)| (t.clone(), i as u32)).collect();
        let idf = idf_table(&snapshot.document_frequency, snapshot.chunks.len());
        Self { snapshot, term_ids, idf }
    }

    /// Read, parse and validate a snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let snapshot: IndexSnapshot = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            built_at = %snapshot.built_at,
            chunks = snapshot.chunks.len(),
            vocab = snapshot.vocabulary.len(),
            "loaded snapshot"
        );
        Self::new(snapshot)
    }

    /// Project the query into vocabulary space. Unknown terms carry no weight
    /// but still count toward the query length.
    fn query_vector(&self, tokens: &[String]) -> SparseVector {
        let ids = tokens.iter().filter_map(|t| self.term_ids.get(t).copied());
        SparseVector::tf_idf(ids, tokens.len(), &self.idf)
    }

    /// Rank chunks by cosine similarity to `query`, highest first.
    ///
    /// The category filter applies before scoring. Chunks with no overlap are
    /// never returned, and equal scores keep snapshot order.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<Hit> {
        if options.k == 0 {
            return Vec::new();
        }
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }
        let query_vec = self.query_vector(&tokens);
        if query_vec.is_empty() {
            return Vec::new();
        }
        let query_norm = query_vec.norm();

        let mut scored: Vec<(f64, &DocumentChunk)> = self
            .snapshot
            .chunks
            .iter()
            .filter(|c| options.category.as_ref().map_or(true, |f| f.matches(&c.category)))
            .filter_map(|c| {
                let dot = sparse_dot(&query_vec.indices, &query_vec.values, &c.indices, &c.values);
                let score = round6(cosine(dot, query_norm, c.norm));
                (score > 0.0).then_some((score, c))
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(options.k)
            .map(|(score, c)| Hit {
                id: c.id.clone(),
                source_path: c.source_path.clone(),
                title: c.title.clone(),
                category: c.category.clone(),
                text: snippet(&c.text, options.max_chars_per_chunk),
                score,
            })
            .collect()
    }

    /// One entry per source path in snapshot order.
    pub fn content_index(&self, exclude_categories: &[String]) -> Vec<ContentEntry> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.snapshot
            .chunks
            .iter()
            .filter(|c| !exclude_categories.iter().any(|x| x == &c.category))
            .filter(|c| seen.insert(c.source_path.as_str()))
            .map(|c| ContentEntry { source_path: c.source_path.clone(), title: c.title.clone(), category: c.category.clone() })
            .collect()
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::from_validated(IndexSnapshot::empty(""))
    }
}

impl Retriever for QueryEngine {
    fn search(&self, query: &str, options: &SearchOptions) -> Vec<Hit> {
        QueryEngine::search(self, query, options)
    }

    fn content_index(&self, exclude_categories: &[String]) -> Vec<ContentEntry> {
        QueryEngine::content_index(self, exclude_categories)
    }
}

/// Cut to `max_chars` characters, marking the cut with an ellipsis.
pub fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}
