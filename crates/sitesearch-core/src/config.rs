//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge compiled-in defaults + `sitesearch.toml` +
//! `sitesearch.<env>.toml` + `SITESEARCH_*` env vars (`__` separates nested
//! keys). Provides helpers to expand `~` and `${VAR}` and to resolve relative
//! paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::SearchOptions;

pub const ENV_PREFIX: &str = "SITESEARCH_";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file("sitesearch.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("sitesearch.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("sitesearch.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("sitesearch.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document. Env vars are not consulted.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = Self { figment: Self::defaults().merge(Toml::string(toml)) };
        config.settings()?;
        Ok(config)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub index: IndexSettings,
    pub query: QuerySettings,
    /// Ordered allow-list; the first matching prefix wins.
    pub categories: Vec<CategoryRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            index: IndexSettings::default(),
            query: QuerySettings::default(),
            categories: default_category_rules(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub content_dir: String,
    pub settings_dir: String,
    pub snapshot_path: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            settings_dir: "content/settings".to_string(),
            snapshot_path: "data/search-index.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub max_vocab: usize,
    pub max_chars: usize,
    pub min_chars: usize,
    pub extensions: Vec<String>,
    /// File names starting with this prefix are templates or drafts.
    pub exclude_prefix: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_vocab: 4000,
            max_chars: 900,
            min_chars: 400,
            extensions: ["md", "mdx", "json", "yaml", "yml"].iter().map(|s| s.to_string()).collect(),
            exclude_prefix: "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub k: usize,
    pub max_chars_per_chunk: usize,
    pub cli_k: usize,
    pub palette_exclude: Vec<String>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { k: 4, max_chars_per_chunk: 400, cli_k: 5, palette_exclude: vec![SETTINGS_CATEGORY.to_string()] }
    }
}

impl QuerySettings {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { k: self.k, category: None, max_chars_per_chunk: self.max_chars_per_chunk }
    }
}

/// Category assigned to every file found under `paths.settings_dir`.
pub const SETTINGS_CATEGORY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub prefix: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(prefix: &str, category: &str) -> Self {
        Self { prefix: prefix.to_string(), category: category.to_string() }
    }
}

pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("blog/", "blogPost"),
        CategoryRule::new("services/", "service"),
        CategoryRule::new("case-studies/", "caseStudy"),
        CategoryRule::new("team/", "teamMember"),
        CategoryRule::new("pages/", "page"),
    ]
}

/// Filesystem locations after expansion and resolution against a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub content_dir: PathBuf,
    pub settings_dir: PathBuf,
    pub snapshot_path: PathBuf,
}

impl Settings {
    pub fn resolve_paths(&self, base: &Path) -> ResolvedPaths {
        ResolvedPaths {
            content_dir: resolve_with_base(base, &self.paths.content_dir),
            settings_dir: resolve_with_base(base, &self.paths.settings_dir),
            snapshot_path: resolve_with_base(base, &self.paths.snapshot_path),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let index = &self.index;
        if index.max_vocab == 0 {
            return Err(Error::InvalidConfig("index.max_vocab must be greater than 0".into()));
        }
        if index.max_chars == 0 {
            return Err(Error::InvalidConfig("index.max_chars must be greater than 0".into()));
        }
        if index.min_chars > index.max_chars {
            return Err(Error::InvalidConfig(format!(
                "index.min_chars ({}) must not exceed index.max_chars ({})",
                index.min_chars, index.max_chars
            )));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
