//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints.
//!
//! ZhipuAI, OpenAI, and OpenRouter all accept the same request shape; only
//! the base URL and credentials differ. For proxied models (OpenRouter) the
//! model id carries the backend vendor prefix and the dimensionality
//! contract is unchanged — width is a property of the requested model, not
//! the serving backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::EmbeddingClient;
use crate::error::{RagError, Result};

#[derive(Debug)]
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl HttpEmbeddingClient {
    pub fn new(base_url: &str, api_key: String, model: &str, dimensions: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            dimensions,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                RagError::Provider(format!("empty embedding response for '{}'", self.model))
            })?;

        if embedding.len() != self.dimensions {
            return Err(RagError::Provider(format!(
                "'{}' returned a {}-dim vector, expected {}",
                self.model,
                embedding.len(),
                self.dimensions
            )));
        }

        tracing::debug!(model = %self.model, dims = embedding.len(), "embedded text");
        Ok(embedding)
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
