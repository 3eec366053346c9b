//! Process-wide service lifecycle.
//!
//! A [`ServiceManager`] is created once at startup and handed to whatever
//! needs RAG access — an explicit context object, not an ambient global.
//! It owns the single [`RagService`] for the process; there is no
//! reinitialization mid-process.

use std::sync::Arc;

use super::RagService;
use crate::config::MailragConfig;
use crate::error::Result;
use crate::registry::Provider;

pub struct ServiceManager {
    rag: Arc<RagService>,
}

impl ServiceManager {
    /// Build the manager and its (unconfigured) RAG service from config.
    pub fn new(config: &MailragConfig) -> Self {
        let rag = Arc::new(RagService::new(
            config.resolved_db_dir(),
            config.retrieval.default_k,
        ));
        Self { rag }
    }

    /// The process's one RAG service. Starts unconfigured; callers share
    /// the same instance for the process lifetime.
    pub fn get_rag_service(&self) -> Arc<RagService> {
        Arc::clone(&self.rag)
    }

    /// Configure (or reconfigure) the RAG service's embedding model.
    pub fn configure_rag(&self, provider: Provider, model: Option<&str>) -> Result<()> {
        self.rag.configure(provider, model)
    }

    /// Release index handles on shutdown.
    pub fn shutdown(&self) {
        self.rag.catalog().close_all();
    }
}
