//! Text-to-vector embedding clients.
//!
//! Provides the [`EmbeddingClient`] capability (text in, fixed-length vector
//! out), the [`ClientFactory`] seam used by the RAG service, and
//! [`HttpClientFactory`], which builds one HTTP-backed client per
//! (provider, model) pair. All supported providers speak the
//! OpenAI-compatible `/embeddings` wire format; the factory selects the base
//! URL and API-key environment variable per provider tag.

pub mod http;

use async_trait::async_trait;

use crate::error::{RagError, Result};
use crate::registry::{EmbeddingConfig, Provider};

const ZHIPUAI_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Capability over one concrete (provider, model) pair.
///
/// `embed` either returns a vector of exactly [`dimensions`](Self::dimensions)
/// floats or fails — never a partial or short vector. One external call per
/// invocation; retries, if any, belong to the caller.
#[async_trait]
pub trait EmbeddingClient: Send + Sync + std::fmt::Debug {
    /// Embed a single text into a fixed-length vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// The model id this client was built for.
    fn model_id(&self) -> &str;

    /// Vector width this client produces.
    fn dimensions(&self) -> usize;
}

/// Constructor seam for embedding clients.
///
/// The production implementation is [`HttpClientFactory`]; tests inject
/// deterministic clients through the same trait.
pub trait ClientFactory: Send + Sync {
    fn make(
        &self,
        config: &EmbeddingConfig,
        dimensions: usize,
    ) -> Result<Box<dyn EmbeddingClient>>;
}

/// Builds [`http::HttpEmbeddingClient`]s with per-provider endpoint and
/// credentials. API keys come from the environment and are never inspected
/// beyond presence.
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn make(
        &self,
        config: &EmbeddingConfig,
        dimensions: usize,
    ) -> Result<Box<dyn EmbeddingClient>> {
        let (base_url, key_var) = match config.provider {
            Provider::Zhipuai => (ZHIPUAI_BASE_URL, "ZHIPUAI_API_KEY"),
            Provider::Openai => (OPENAI_BASE_URL, "OPENAI_API_KEY"),
            Provider::Openrouter => (OPENROUTER_BASE_URL, "OPENROUTER_API_KEY"),
        };
        let api_key = std::env::var(key_var).map_err(|_| {
            RagError::Provider(format!(
                "{key_var} is not set (required for provider '{}')",
                config.provider
            ))
        })?;

        Ok(Box::new(http::HttpEmbeddingClient::new(
            base_url,
            api_key,
            &config.model,
            dimensions,
        )))
    }
}
