//! Domain types shared by the index builder and the query engine.
//!
//! The snapshot types double as the on-disk JSON wire format, so their serde
//! field names are fixed and must not drift.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type ChunkId = String;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;
/// Weighting-scheme tag written into every snapshot.
pub const METHOD_BOW_TFIDF: &str = "bow-tfidf";

/// A bounded slice of a source document before vectorisation.
///
/// - `id`: `{source}#{ordinal}`, ordinal is 1-based within the source
/// - `source_path`: path of the originating file as recorded in the snapshot
/// - `category`: allow-list classification used for filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: ChunkId,
    pub source_path: String,
    pub category: String,
    pub title: String,
    pub text: String,
}

/// A chunk together with its sparse TF-IDF vector, as stored in the snapshot.
///
/// `indices` is strictly ascending and aligned with `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    #[serde(rename = "path")]
    pub source_path: String,
    pub title: String,
    #[serde(rename = "collection")]
    pub category: String,
    pub text: String,
    pub indices: Vec<u32>,
    pub values: Vec<f64>,
    pub norm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub version: u32,
    pub method: String,
    #[serde(rename = "builtAt")]
    pub built_at: String,
    #[serde(rename = "vocab")]
    pub vocabulary: Vec<String>,
    #[serde(rename = "df")]
    pub document_frequency: Vec<u32>,
    pub chunks: Vec<DocumentChunk>,
}

impl IndexSnapshot {
    pub fn empty(built_at: impl Into<String>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            method: METHOD_BOW_TFIDF.to_string(),
            built_at: built_at.into(),
            vocabulary: Vec::new(),
            document_frequency: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Check the structural invariants a reader relies on.
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::InvalidSnapshot(format!("unsupported version {}", self.version)));
        }
        if self.method != METHOD_BOW_TFIDF {
            return Err(Error::InvalidSnapshot(format!("unsupported method '{}'", self.method)));
        }
        if self.vocabulary.len() != self.document_frequency.len() {
            return Err(Error::InvalidSnapshot(format!(
                "vocab has {} terms but df has {} entries",
                self.vocabulary.len(),
                self.document_frequency.len()
            )));
        }
        let vocab_len = self.vocabulary.len();
        for chunk in &self.chunks {
            if chunk.indices.len() != chunk.values.len() {
                return Err(Error::InvalidSnapshot(format!("chunk {} has misaligned indices/values", chunk.id)));
            }
            let mut prev: Option<u32> = None;
            for &idx in &chunk.indices {
                if idx as usize >= vocab_len {
                    return Err(Error::InvalidSnapshot(format!("chunk {} references term {} outside vocab", chunk.id, idx)));
                }
                if prev.is_some_and(|p| p >= idx) {
                    return Err(Error::InvalidSnapshot(format!("chunk {} indices are not strictly ascending", chunk.id)));
                }
                prev = Some(idx);
            }
        }
        Ok(())
    }
}

/// One entry per source for the command palette listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "path")]
    pub source_path: String,
    pub title: String,
    #[serde(rename = "collection")]
    pub category: String,
}

/// A ranked search result. `score` is the cosine similarity, higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: ChunkId,
    #[serde(rename = "path")]
    pub source_path: String,
    pub title: String,
    #[serde(rename = "collection")]
    pub category: String,
    pub text: String,
    pub score: f64,
}

/// Category restriction: one label or a set of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryFilter {
    One(String),
    Many(Vec<String>),
}

impl CategoryFilter {
    /// An empty set admits nothing.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::One(c) => c == category,
            Self::Many(cs) => cs.iter().any(|c| c == category),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for CategoryFilter {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    pub k: usize,
    pub category: Option<CategoryFilter>,
    pub max_chars_per_chunk: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { k: 4, category: None, max_chars_per_chunk: 400 }
    }
}

impl SearchOptions {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_max_chars(mut self, max_chars_per_chunk: usize) -> Self {
        self.max_chars_per_chunk = max_chars_per_chunk;
        self
    }
}

/// Round to six decimal places, the precision used for stored weights and scores.
pub fn round6(x: f64) -> f64 {
    (x * 1_000_000.0).round() / 1_000_000.0
}
