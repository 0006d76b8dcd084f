//! sitesearch-index
//!
//! Offline builder: scans the corpus, builds the capped TF-IDF index and
//! writes the JSON snapshot consumed by `sitesearch-query`.

pub mod builder;
pub mod writer;

use std::path::{Path, PathBuf};
use tracing::info;

use sitesearch_core::config::Settings;
use sitesearch_core::data_processor::DataProcessor;
use sitesearch_core::error::Result;

pub use builder::IndexBuilder;
pub use writer::write_snapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub files_seen: usize,
    pub files_unclassified: usize,
    pub files_skipped: usize,
    pub documents: usize,
    pub chunks: usize,
    pub vocabulary: usize,
    pub output: PathBuf,
}

/// Full rebuild: scan, index, write. Only a failed write is an error; a missing
/// corpus produces an empty snapshot.
pub fn run(settings: &Settings, base: &Path, show_progress: bool) -> Result<BuildReport> {
    let paths = settings.resolve_paths(base);
    info!(content = %paths.content_dir.display(), settings = %paths.settings_dir.display(), "building search index");

    let scan = DataProcessor::new(settings).with_progress(show_progress).process_corpus(&paths);
    let snapshot = IndexBuilder::from_settings(&settings.index).build(&scan.chunks);
    write_snapshot(&paths.snapshot_path, &snapshot)?;

    Ok(BuildReport {
        files_seen: scan.files_seen,
        files_unclassified: scan.files_unclassified,
        files_skipped: scan.files_skipped,
        documents: scan.documents,
        chunks: snapshot.chunks.len(),
        vocabulary: snapshot.vocabulary.len(),
        output: paths.snapshot_path,
    })
}
