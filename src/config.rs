use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::registry::Provider;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailragConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingDefaults,
    pub retrieval: RetrievalConfig,
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one index file per (provider, model) pair.
    pub db_dir: String,
}

/// Default embedding selection used when the CLI does not name one.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingDefaults {
    pub provider: Provider,
    /// Model id within the provider's supported set. Empty means the
    /// provider's registry default.
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_k: usize,
}

/// Chunking parameters, passed through untouched to the splitter collaborator.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for MailragConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingDefaults::default(),
            retrieval: RetrievalConfig::default(),
            chunking: ChunkingConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_dir = default_mailrag_dir()
            .join("db")
            .to_string_lossy()
            .into_owned();
        Self { db_dir }
    }
}

impl Default for EmbeddingDefaults {
    fn default() -> Self {
        Self {
            provider: Provider::Zhipuai,
            model: "embedding-3".into(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { default_k: 3 }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

/// Returns `~/.mailrag/`
pub fn default_mailrag_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".mailrag")
}

/// Returns the default config file path: `~/.mailrag/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mailrag_dir().join("config.toml")
}

impl MailragConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MailragConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MAILRAG_DB_DIR, MAILRAG_LOG_LEVEL,
    /// MAILRAG_PROVIDER, MAILRAG_MODEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MAILRAG_DB_DIR") {
            self.storage.db_dir = val;
        }
        if let Ok(val) = std::env::var("MAILRAG_LOG_LEVEL") {
            self.service.log_level = val;
        }
        if let Ok(val) = std::env::var("MAILRAG_PROVIDER") {
            if let Ok(provider) = val.parse() {
                self.embedding.provider = provider;
            }
        }
        if let Ok(val) = std::env::var("MAILRAG_MODEL") {
            self.embedding.model = val;
        }
    }

    /// Resolve the index directory, expanding `~` if needed.
    pub fn resolved_db_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.db_dir)
    }

    /// The configured default model, or `None` to use the registry default.
    pub fn default_model(&self) -> Option<&str> {
        if self.embedding.model.is_empty() {
            None
        } else {
            Some(&self.embedding.model)
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
