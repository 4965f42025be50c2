//! Mapper configuration
//!
//! Loaded in layers: defaults, then an optional JSON file (explicit path or
//! `EXPRMAP_CONFIG`), then environment overrides (`EXPRMAP_MAX_DEPTH`,
//! `EXPRMAP_DIALECT`).
//!
//! ```json
//! {
//!     "max_depth": 32,
//!     "dialect": "postgres",
//!     "word_list_cache": { "max_entries": 500, "ttl_secs": 60 },
//!     "debug": false
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::sql::{DialectKind, SqlDialect};
use crate::constants::{
    DEFAULT_MAX_DEPTH, DEFAULT_WORD_LIST_CACHE_MAX_ENTRIES, DEFAULT_WORD_LIST_CACHE_TTL_SECS,
    ENV_CONFIG, ENV_DIALECT, ENV_MAX_DEPTH,
};

/// Word list cache section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
struct WordListCacheFileConfig {
    max_entries: Option<u64>,
    ttl_secs: Option<u64>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    max_depth: Option<usize>,
    dialect: Option<DialectKind>,
    word_list_cache: Option<WordListCacheFileConfig>,
    debug: Option<bool>,
    #[serde(flatten)]
    extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

/// Word list cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordListCacheConfig {
    pub max_entries: u64,
    pub ttl_secs: u64,
}

impl Default for WordListCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_WORD_LIST_CACHE_MAX_ENTRIES,
            ttl_secs: DEFAULT_WORD_LIST_CACHE_TTL_SECS,
        }
    }
}

/// Resolved mapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Maximum expression nesting depth
    pub max_depth: usize,
    /// SQL dialect used to render compiled relational predicates
    pub dialect: DialectKind,
    pub word_list_cache: WordListCacheConfig,
    pub debug: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            dialect: DialectKind::default(),
            word_list_cache: WordListCacheConfig::default(),
            debug: false,
        }
    }
}

impl MapperConfig {
    /// SQL dialect selected by `dialect`
    pub fn sql_dialect(&self) -> &'static dyn SqlDialect {
        self.dialect.dialect()
    }

    /// Load configuration from `path` (or `EXPRMAP_CONFIG`) and the process
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load configuration with environment lookups going through `env`
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        tracing::debug!("Loading mapper configuration");

        let config_path = path
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from));

        let file_config = match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                let file_config = FileConfig::load_from_file(&path)?;
                file_config.warn_unknown_fields();
                file_config
            }
            None => FileConfig::default(),
        };
        let file_cache = file_config.word_list_cache.unwrap_or_default();

        let max_depth = match env(ENV_MAX_DEPTH) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid {}: {}", ENV_MAX_DEPTH, raw))?,
            None => file_config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        };

        let dialect = match env(ENV_DIALECT) {
            Some(raw) => raw
                .parse::<DialectKind>()
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", ENV_DIALECT, e))?,
            None => file_config.dialect.unwrap_or_default(),
        };

        let config = Self {
            max_depth,
            dialect,
            word_list_cache: WordListCacheConfig {
                max_entries: file_cache
                    .max_entries
                    .unwrap_or(DEFAULT_WORD_LIST_CACHE_MAX_ENTRIES),
                ttl_secs: file_cache
                    .ttl_secs
                    .unwrap_or(DEFAULT_WORD_LIST_CACHE_TTL_SECS),
            },
            debug: file_config.debug.unwrap_or(false),
        };

        config.validate()?;
        tracing::debug!(config = ?config, "Mapper configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            anyhow::bail!("Configuration error: max_depth must be greater than 0");
        }
        if self.word_list_cache.max_entries == 0 {
            tracing::warn!("word_list_cache.max_entries is 0, word lists will not be cached");
        }
        if self.word_list_cache.ttl_secs == 0 {
            tracing::warn!("word_list_cache.ttl_secs is 0, cached word lists expire immediately");
        }
        Ok(())
    }
}
