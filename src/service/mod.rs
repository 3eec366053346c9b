//! The RAG façade: one active (provider, model, client, index) tuple,
//! swappable at runtime.
//!
//! Callers never see which provider is active — [`RagService::process_for_context`]
//! works against whatever [`ActiveSession`] is current, and
//! [`RagService::switch_embedding_model`] replaces the session with a single
//! atomic reference swap. In-flight calls keep the session they started
//! with; a failed switch leaves the previous session serving.

pub mod manager;

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::embedding::{ClientFactory, EmbeddingClient, HttpClientFactory};
use crate::error::{RagError, Result};
use crate::index::catalog::IndexCatalog;
use crate::index::{ContextChunk, IndexStore};
use crate::registry::{EmbeddingConfig, EmbeddingProviderRegistry, Provider};

/// The currently selected embedding config with its client and index.
/// Replaced wholesale on switch, never mutated in place.
struct ActiveSession {
    config: EmbeddingConfig,
    client: Box<dyn EmbeddingClient>,
    index: Arc<IndexStore>,
}

pub struct RagService {
    registry: EmbeddingProviderRegistry,
    catalog: IndexCatalog,
    factory: Box<dyn ClientFactory>,
    default_k: usize,
    session: RwLock<Option<Arc<ActiveSession>>>,
}

impl RagService {
    /// A new, unconfigured service storing indexes under `db_dir`.
    pub fn new(db_dir: impl Into<PathBuf>, default_k: usize) -> Self {
        Self::with_factory(db_dir, default_k, Box::new(HttpClientFactory))
    }

    /// Like [`new`](Self::new), with an injected client factory (tests use
    /// this to supply deterministic embedding clients).
    pub fn with_factory(
        db_dir: impl Into<PathBuf>,
        default_k: usize,
        factory: Box<dyn ClientFactory>,
    ) -> Self {
        Self {
            registry: EmbeddingProviderRegistry::builtin(),
            catalog: IndexCatalog::new(db_dir),
            factory,
            default_k,
            session: RwLock::new(None),
        }
    }

    /// Select a (provider, model) pair and make it the active session.
    ///
    /// Resolves the config, builds the client, opens the index, and only
    /// then swaps the session reference — any failure along the way leaves
    /// the previous session (or the unconfigured state) untouched.
    /// Re-entrant: configuring the same pair again is not an error.
    pub fn configure(&self, provider: Provider, model: Option<&str>) -> Result<()> {
        let config = self.registry.resolve(provider, model)?;
        let descriptor = self.registry.descriptor(&config)?;
        let client = self.factory.make(&config, descriptor.dimensions)?;
        let index = self.catalog.open_or_create(&config, descriptor.dimensions)?;

        let session = Arc::new(ActiveSession {
            config: config.clone(),
            client,
            index,
        });

        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);

        tracing::info!(config = %config, dimensions = descriptor.dimensions, "embedding model active");
        Ok(())
    }

    /// Switch the active embedding model at runtime. Identical contract to
    /// [`configure`](Self::configure); in-flight queries finish on the
    /// session they captured.
    pub fn switch_embedding_model(&self, provider: Provider, model: &str) -> Result<()> {
        self.configure(provider, Some(model))
    }

    /// Embed `text` and return up to `k` (default: configured `default_k`)
    /// context chunks from the active index, best first.
    pub async fn process_for_context(
        &self,
        text: &str,
        k: Option<usize>,
    ) -> Result<Vec<ContextChunk>> {
        if text.trim().is_empty() {
            return Err(RagError::InvalidArgument(
                "text must not be empty".into(),
            ));
        }
        let session = self.active_session()?;
        let k = k.unwrap_or(self.default_k);

        let vector = session.client.embed(text).await?;
        session.index.query(&vector, k)
    }

    /// Embed and store a batch of chunk texts in the active index, all
    /// attributed to `source`. Returns the number of chunks stored.
    pub async fn ingest(&self, chunks: &[String], source: Option<&str>) -> Result<usize> {
        let session = self.active_session()?;

        let mut stored = 0;
        for chunk in chunks {
            if chunk.trim().is_empty() {
                continue;
            }
            let vector = session.client.embed(chunk).await?;
            session.index.insert(&vector, chunk, source)?;
            stored += 1;
        }

        tracing::debug!(config = %session.config, stored, "ingested chunks");
        Ok(stored)
    }

    /// The active (provider, model) pair, if configured.
    pub fn current_config(&self) -> Option<EmbeddingConfig> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.config.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.current_config().is_some()
    }

    /// The catalog of open index handles (exposed for lifecycle control:
    /// `catalog().close_all()` on shutdown or between tests).
    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    /// The provider registry backing this service.
    pub fn registry(&self) -> &EmbeddingProviderRegistry {
        &self.registry
    }

    /// Capture the current session. The clone is what in-flight calls hold
    /// across awaits, so a concurrent swap never affects them.
    fn active_session(&self) -> Result<Arc<ActiveSession>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
            .ok_or(RagError::NotConfigured)
    }
}
