use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{cache::DEFAULT_CACHE_TTL_SECS, errors::BlogError};

pub const CONFIG_FILE_NAME: &str = "quire.toml";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "QUIRE_CONFIG";

/// Configuration stored in `quire.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuireConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_redis_url(),
            prefix: default_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL:-redis://127.0.0.1/}".to_string()
}

fn default_prefix() -> String {
    "quire".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl QuireConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, BlogError> {
        toml::from_str(content).map_err(|err| BlogError::Config {
            message: format!("failed to parse {CONFIG_FILE_NAME}: {err}"),
        })
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, BlogError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|err| BlogError::Config {
            message: format!("failed to read {}: {err}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Redis URL with `${VAR}` / `${VAR:-fallback}` expanded.
    pub fn redis_url(&self) -> Result<String, BlogError> {
        expand_env(&self.store.url)
    }

    /// Cache lifetime, or `None` when the listing cache is disabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache.enabled && self.cache.ttl_secs > 0).then(|| Duration::seconds(self.cache.ttl_secs as i64))
    }
}

/// Picks the config file: an explicit path, then `QUIRE_CONFIG`, then `./quire.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

fn expand_env(value: &str) -> Result<String, BlogError> {
    let Some(inner) = value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) else {
        return Ok(value.to_string());
    };
    let (name, fallback) = match inner.split_once(":-") {
        Some((name, fallback)) => (name, Some(fallback)),
        None => (inner, None),
    };
    match (std::env::var(name), fallback) {
        (Ok(resolved), _) if !resolved.is_empty() => Ok(resolved),
        (_, Some(fallback)) => Ok(fallback.to_string()),
        _ => Err(BlogError::Config {
            message: format!("environment variable {name} not set"),
        }),
    }
}
