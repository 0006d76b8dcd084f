//! sitesearch-query
//!
//! Online half of site search: loads the snapshot once per process and ranks
//! chunks against free-text queries by sparse cosine similarity.

pub mod cache;
pub mod engine;
pub mod similarity;

use std::path::{Path, PathBuf};

use sitesearch_core::config::Settings;
use sitesearch_core::traits::Retriever;
use sitesearch_core::types::{ContentEntry, Hit, SearchOptions};

pub use engine::QueryEngine;

/// Retriever backed by a snapshot file through the process-wide cache.
/// A missing or corrupt snapshot behaves as an empty index.
#[derive(Debug, Clone)]
pub struct SnapshotRetriever {
    path: PathBuf,
}

impl SnapshotRetriever {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_settings(settings: &Settings, base: &Path) -> Self {
        Self::new(settings.resolve_paths(base).snapshot_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Retriever for SnapshotRetriever {
    fn search(&self, query: &str, options: &SearchOptions) -> Vec<Hit> {
        cache::load_cached(&self.path).map(|e| e.search(query, options)).unwrap_or_default()
    }

    fn content_index(&self, exclude_categories: &[String]) -> Vec<ContentEntry> {
        cache::load_cached(&self.path).map(|e| e.content_index(exclude_categories)).unwrap_or_default()
    }
}

pub fn search(snapshot_path: &Path, query: &str, options: &SearchOptions) -> Vec<Hit> {
    SnapshotRetriever::new(snapshot_path).search(query, options)
}
