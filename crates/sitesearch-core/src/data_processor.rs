//! Corpus scanning: file discovery, text extraction, allow-list classification
//! and chunking. Every failure here is local to one file; the scan itself
//! never fails.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::chunking::{chunk_text, ChunkingConfig};
use crate::config::{CategoryRule, ResolvedPaths, Settings, SETTINGS_CATEGORY};
use crate::error::{Error, Result};
use crate::types::TextChunk;

/// Label prepended to paths of files found under the settings directory.
const SETTINGS_LABEL: &str = "settings";

/// A classified, extracted document prior to chunking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path relative to its source root, `/`-separated. Chunk ids derive from it.
    pub rel_path: String,
    pub source_path: String,
    pub category: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusScan {
    pub chunks: Vec<TextChunk>,
    pub files_seen: usize,
    pub files_unclassified: usize,
    pub files_skipped: usize,
    pub documents: usize,
}

pub struct DataProcessor {
    chunking_config: ChunkingConfig,
    extensions: Vec<String>,
    exclude_prefix: String,
    rules: Vec<CategoryRule>,
    content_label: String,
    settings_label: String,
    show_progress: bool,
}

impl DataProcessor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            chunking_config: ChunkingConfig { max_chars: settings.index.max_chars, min_chars: settings.index.min_chars },
            extensions: settings.index.extensions.iter().map(|e| e.trim_start_matches('.').to_lowercase()).collect(),
            exclude_prefix: settings.index.exclude_prefix.clone(),
            rules: settings.categories.clone(),
            content_label: settings.paths.content_dir.trim_end_matches('/').to_string(),
            settings_label: settings.paths.settings_dir.trim_end_matches('/').to_string(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Scan the content and settings roots into chunks. Missing roots yield nothing.
    pub fn process_corpus(&self, paths: &ResolvedPaths) -> CorpusScan {
        let mut scan = CorpusScan::default();

        let mut sources: Vec<(PathBuf, String, String)> = Vec::new();
        for file in self.list_source_files(&paths.content_dir, Some(&paths.settings_dir)) {
            let rel = relative_slash_path(&file, &paths.content_dir);
            scan.files_seen += 1;
            match self.classify(&rel) {
                Some(category) => {
                    let category = category.to_string();
                    sources.push((file, rel, category));
                }
                None => {
                    debug!(path = %rel, "no category rule matches, dropping");
                    scan.files_unclassified += 1;
                }
            }
        }
        for file in self.list_source_files(&paths.settings_dir, None) {
            let rel = format!("{}/{}", SETTINGS_LABEL, relative_slash_path(&file, &paths.settings_dir));
            scan.files_seen += 1;
            sources.push((file, rel, SETTINGS_CATEGORY.to_string()));
        }

        let pb = if self.show_progress { ProgressBar::new(sources.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }

        for (file, rel, category) in sources {
            pb.set_message(rel.clone());
            match self.load_document(&file, &rel, &category) {
                Ok(doc) => {
                    let chunks = self.chunk_document(&doc);
                    debug!(path = %doc.source_path, chunks = chunks.len(), "chunked document");
                    scan.documents += 1;
                    scan.chunks.extend(chunks);
                }
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "skipping unreadable document");
                    scan.files_skipped += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            files = scan.files_seen,
            documents = scan.documents,
            unclassified = scan.files_unclassified,
            skipped = scan.files_skipped,
            chunks = scan.chunks.len(),
            "processed corpus"
        );
        scan
    }

    /// First matching prefix rule wins. `None` means the file is not indexed.
    pub fn classify(&self, rel_path: &str) -> Option<&str> {
        self.rules.iter().find(|r| rel_path.starts_with(&r.prefix)).map(|r| r.category.as_str())
    }

    pub fn chunk_document(&self, doc: &SourceDocument) -> Vec<TextChunk> {
        chunk_text(&doc.text, &self.chunking_config)
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextChunk {
                id: format!("{}#{}", doc.rel_path, i + 1),
                source_path: doc.source_path.clone(),
                category: doc.category.clone(),
                title: doc.title.clone(),
                text,
            })
            .collect()
    }

    fn load_document(&self, file: &Path, rel: &str, category: &str) -> Result<SourceDocument> {
        let content = read_file_content(file)?;
        let stem = file.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let (title, text) = match extension_of(file).as_deref() {
            Some("json") => extract_flat(serde_json::from_str(&content)?, &stem),
            Some("yaml") | Some("yml") => extract_flat(serde_yaml::from_str(&content)?, &stem),
            _ => extract_structured(&content, &stem)?,
        };
        let label = if category == SETTINGS_CATEGORY { &self.settings_label } else { &self.content_label };
        let within_root = if category == SETTINGS_CATEGORY {
            rel.strip_prefix(SETTINGS_LABEL).map(|r| r.trim_start_matches('/')).unwrap_or(rel)
        } else {
            rel
        };
        Ok(SourceDocument {
            rel_path: rel.to_string(),
            source_path: join_label(label, within_root),
            category: category.to_string(),
            title,
            text,
        })
    }

    fn list_source_files(&self, root: &Path, skip: Option<&Path>) -> Vec<PathBuf> {
        if !root.is_dir() {
            info!(path = %root.display(), "source directory not found, nothing to scan");
            return Vec::new();
        }
        let mut files = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| skip.map_or(true, |s| e.path() != s));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let excluded = !self.exclude_prefix.is_empty()
                && path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with(&self.exclude_prefix));
            let supported = extension_of(path).is_some_and(|ext| self.extensions.contains(&ext));
            if supported && !excluded {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        files
    }
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => {
            let bytes = fs::read(file_path).map_err(|e| Error::io(file_path, e))?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_lowercase)
}

fn relative_slash_path(file: &Path, root: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

fn join_label(label: &str, rel: &str) -> String {
    if label.is_empty() || label == "." { rel.to_string() } else { format!("{}/{}", label, rel) }
}

/// Split a `---` delimited metadata header from the body.
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let content = content.trim_start_matches('\u{feff}');
    let Some(rest) = content.strip_prefix("---") else { return (None, content) };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else { return (None, content) };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

fn front_matter_str<'a>(meta: &'a serde_yaml::Value, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(|v| v.as_str()).map(str::trim).filter(|s| !s.is_empty())
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|l| l.trim_start().strip_prefix("# "))
        .map(|h| h.trim().trim_end_matches('#').trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Markdown-style document: optional YAML header plus body.
/// Title order: `title`, `name`, first `# ` heading, file stem.
pub fn extract_structured(content: &str, stem: &str) -> Result<(String, String)> {
    let (header, body) = split_front_matter(content);
    let meta: serde_yaml::Value = match header {
        Some(h) => serde_yaml::from_str(h)?,
        None => serde_yaml::Value::Null,
    };
    let title = front_matter_str(&meta, "title")
        .or_else(|| front_matter_str(&meta, "name"))
        .map(str::to_string)
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| stem.to_string());
    let body = body.trim();
    let text = match front_matter_str(&meta, "description") {
        Some(desc) if body.is_empty() => desc.to_string(),
        Some(desc) => format!("{}\n\n{}", desc, body),
        None => body.to_string(),
    };
    Ok((title, text))
}

/// Flat key-value document: nested structures become `key.path: value` lines.
pub fn extract_flat(value: Value, stem: &str) -> (String, String) {
    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| stem.to_string());
    let mut lines = Vec::new();
    flatten_value("", &value, &mut lines);
    (title, lines.join("\n"))
}

pub fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<String>) {
    let key = |k: &str| if prefix.is_empty() { k.to_string() } else { format!("{}.{}", prefix, k) };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_value(&key(k), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_value(&key(&i.to_string()), v, out);
            }
        }
        Value::Null => {}
        Value::String(s) if prefix.is_empty() => out.push(s.clone()),
        Value::String(s) => out.push(format!("{}: {}", prefix, s)),
        other if prefix.is_empty() => out.push(other.to_string()),
        other => out.push(format!("{}: {}", prefix, other)),
    }
}
