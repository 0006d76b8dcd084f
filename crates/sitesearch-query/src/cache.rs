//! Process-wide memo of loaded snapshots, keyed by path.
//!
//! Entries live until the process exits. Two threads may both load the same
//! file on a cold cache; the first insert wins and the other copy is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::warn;

use crate::engine::QueryEngine;

static ENGINES: OnceLock<RwLock<HashMap<PathBuf, Arc<QueryEngine>>>> = OnceLock::new();

fn engines() -> &'static RwLock<HashMap<PathBuf, Arc<QueryEngine>>> {
    ENGINES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Load failures are logged and not cached, so a later call retries.
pub fn load_cached(path: &Path) -> Option<Arc<QueryEngine>> {
    if let Some(engine) = engines().read().ok().and_then(|m| m.get(path).cloned()) {
        return Some(engine);
    }
    match QueryEngine::open(path) {
        Ok(engine) => {
            let engine = Arc::new(engine);
            match engines().write() {
                Ok(mut map) => Some(Arc::clone(map.entry(path.to_path_buf()).or_insert(engine))),
                Err(_) => Some(engine),
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "search index unavailable");
            None
        }
    }
}

pub fn is_cached(path: &Path) -> bool {
    engines().read().map(|m| m.contains_key(path)).unwrap_or(false)
}
