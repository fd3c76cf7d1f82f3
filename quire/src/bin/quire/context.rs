use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quire::{
    Blog, MemoryStore, QuireConfig, RedisStore, StoreBackend, Viewer,
    config::resolve_config_path,
};

/// Everything a command needs besides its own arguments.
pub struct AppContext {
    pub config_path: PathBuf,
    pub config: QuireConfig,
    pub viewer: Viewer,
}

impl AppContext {
    /// Loads the config file (defaults when absent) and records who is acting.
    pub fn load(explicit: Option<&Path>, acting_as: Option<String>) -> Result<Self> {
        let config_path = resolve_config_path(explicit);
        let config = QuireConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        let viewer = acting_as.map(Viewer::Authenticated).unwrap_or_default();
        Ok(Self {
            config_path,
            config,
            viewer,
        })
    }

    pub fn backend(&self) -> StoreBackend {
        self.config.store.backend
    }

    pub async fn redis_blog(&self) -> Result<Blog<RedisStore>> {
        let url = self.config.redis_url()?;
        let store = RedisStore::connect(&url, self.config.store.prefix.clone())
            .await
            .with_context(|| format!("Failed to connect to Redis at {url}"))?;
        Ok(Blog::from_config(store, &self.config))
    }

    /// A blog that lives for this invocation only.
    pub fn memory_blog(&self) -> Blog<MemoryStore> {
        Blog::from_config(MemoryStore::new(), &self.config)
    }

    pub fn describe_viewer(&self) -> String {
        match self.viewer.username() {
            Some(username) => format!("acting as '{username}'"),
            None => "acting anonymously".to_string(),
        }
    }
}
