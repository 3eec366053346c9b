#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use mailrag::embedding::{ClientFactory, EmbeddingClient};
use mailrag::error::Result;
use mailrag::registry::{EmbeddingConfig, Provider};
use mailrag::service::RagService;

/// Record of every embed call: (model id, produced vector length).
pub type EmbedLog = Arc<Mutex<Vec<(String, usize)>>>;

/// Deterministic embedding client: a unit vector with a spike position
/// derived from the text, so identical texts always land on identical
/// vectors and distinct texts are orthogonal-ish.
#[derive(Debug)]
pub struct MockEmbeddingClient {
    model: String,
    dimensions: usize,
    delay: Option<Duration>,
    log: EmbedLog,
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut v = vec![0.0f32; self.dimensions];
        let spike = text.bytes().map(usize::from).sum::<usize>() % self.dimensions;
        v[spike] = 1.0;
        self.log
            .lock()
            .unwrap()
            .push((self.model.clone(), self.dimensions));
        Ok(v)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Factory producing [`MockEmbeddingClient`]s, with optional per-provider
/// artificial latency (used to hold a call in flight across a model switch).
pub struct MockClientFactory {
    log: EmbedLog,
    delay_for: Option<(Provider, Duration)>,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            delay_for: None,
        }
    }

    pub fn with_delay(provider: Provider, delay: Duration) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            delay_for: Some((provider, delay)),
        }
    }

    pub fn log(&self) -> EmbedLog {
        Arc::clone(&self.log)
    }
}

impl ClientFactory for MockClientFactory {
    fn make(
        &self,
        config: &EmbeddingConfig,
        dimensions: usize,
    ) -> Result<Box<dyn EmbeddingClient>> {
        let delay = self
            .delay_for
            .and_then(|(p, d)| (p == config.provider).then_some(d));
        Ok(Box::new(MockEmbeddingClient {
            model: config.model.clone(),
            dimensions,
            delay,
            log: Arc::clone(&self.log),
        }))
    }
}

/// A service over a temp dir with mock clients. Returns the embed log too.
pub fn mock_service(dir: &tempfile::TempDir) -> (RagService, EmbedLog) {
    let factory = MockClientFactory::new();
    let log = factory.log();
    (
        RagService::with_factory(dir.path(), 3, Box::new(factory)),
        log,
    )
}

/// Last recorded embed call, as (model id, vector length).
pub fn last_embed(log: &EmbedLog) -> (String, usize) {
    log.lock().unwrap().last().cloned().expect("no embed calls recorded")
}
