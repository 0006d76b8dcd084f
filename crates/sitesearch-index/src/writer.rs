use std::fs;
use std::path::Path;
use tracing::info;

use sitesearch_core::error::{Error, Result};
use sitesearch_core::types::IndexSnapshot;

/// Serialize the snapshot as compact JSON, creating parent directories.
/// Concurrent writers to the same path race; the last one wins.
pub fn write_snapshot(path: &Path, snapshot: &IndexSnapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let bytes = serde_json::to_vec(snapshot)?;
    fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote snapshot");
    Ok(())
}
