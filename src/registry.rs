//! Static catalog of embedding providers and their models.
//!
//! Defines [`Provider`] (the closed set of supported provider tags),
//! [`ModelDescriptor`] / [`ProviderDescriptor`] (immutable build-time data),
//! [`EmbeddingConfig`] (the value type that keys both the client and the
//! on-disk index), and [`EmbeddingProviderRegistry`] (pure lookup, no I/O).
//!
//! Adding a provider means adding one [`Provider`] variant, one descriptor
//! entry in [`EmbeddingProviderRegistry::builtin`], and one factory arm in
//! `crate::embedding` — call sites never change.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// The supported embedding providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// ZhipuAI (bigmodel.cn) embedding API.
    Zhipuai,
    /// OpenAI embedding API.
    Openai,
    /// OpenRouter proxy — model ids carry the backend vendor prefix
    /// (e.g. `openai/text-embedding-3-small`).
    Openrouter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zhipuai => "zhipuai",
            Self::Openai => "openai",
            Self::Openrouter => "openrouter",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zhipuai" => Ok(Self::Zhipuai),
            "openai" => Ok(Self::Openai),
            "openrouter" => Ok(Self::Openrouter),
            other => Err(RagError::UnknownProvider(other.to_string())),
        }
    }
}

/// One embedding model as a provider exposes it.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub model_id: &'static str,
    /// Vector width the model produces. The client contract guarantees a
    /// returned vector has exactly this length or the call fails.
    pub dimensions: usize,
    /// Routing detail for proxied models (e.g. "proxied to OpenAI").
    pub routing_note: Option<&'static str>,
}

/// A provider and its supported models, in catalog order.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    pub models: Vec<ModelDescriptor>,
    pub default_model: &'static str,
}

/// A resolved (provider, model) pair. Uniquely determines the embedding
/// client and the on-disk index location. Equal iff both fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: Provider,
    pub model: String,
}

impl EmbeddingConfig {
    /// Deterministic index file name for this config.
    ///
    /// Compatibility contract: `db_<provider>_<model>` with every character
    /// outside `[A-Za-z0-9]` replaced by `_`, plus the `.sqlite3` suffix.
    /// Changing this breaks reuse of previously built indexes.
    pub fn index_file_name(&self) -> String {
        let clean: String = self
            .model
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("db_{}_{}.sqlite3", self.provider, clean)
    }
}

impl std::fmt::Display for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Build-time catalog of providers, models, and defaults. Pure data.
#[derive(Debug, Clone)]
pub struct EmbeddingProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

impl EmbeddingProviderRegistry {
    /// The compiled-in catalog.
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                ProviderDescriptor {
                    provider: Provider::Zhipuai,
                    models: vec![
                        ModelDescriptor {
                            model_id: "embedding-3",
                            dimensions: 1024,
                            routing_note: None,
                        },
                        ModelDescriptor {
                            model_id: "embedding-2",
                            dimensions: 1024,
                            routing_note: None,
                        },
                    ],
                    default_model: "embedding-3",
                },
                ProviderDescriptor {
                    provider: Provider::Openai,
                    models: vec![
                        ModelDescriptor {
                            model_id: "text-embedding-3-small",
                            dimensions: 1536,
                            routing_note: None,
                        },
                        ModelDescriptor {
                            model_id: "text-embedding-3-large",
                            dimensions: 3072,
                            routing_note: None,
                        },
                        ModelDescriptor {
                            model_id: "text-embedding-ada-002",
                            dimensions: 1536,
                            routing_note: None,
                        },
                    ],
                    default_model: "text-embedding-3-small",
                },
                ProviderDescriptor {
                    provider: Provider::Openrouter,
                    models: vec![
                        ModelDescriptor {
                            model_id: "openai/text-embedding-3-small",
                            dimensions: 1536,
                            routing_note: Some("proxied to OpenAI"),
                        },
                        ModelDescriptor {
                            model_id: "openai/text-embedding-3-large",
                            dimensions: 3072,
                            routing_note: Some("proxied to OpenAI"),
                        },
                    ],
                    default_model: "openai/text-embedding-3-small",
                },
            ],
        }
    }

    /// Resolve a provider and optional model to a concrete config.
    ///
    /// Falls back to the provider's default model when `model` is `None`.
    pub fn resolve(&self, provider: Provider, model: Option<&str>) -> Result<EmbeddingConfig> {
        let descriptor = self.provider_descriptor(provider)?;
        let model_id = match model {
            Some(m) => {
                if !descriptor.models.iter().any(|d| d.model_id == m) {
                    return Err(RagError::UnknownModel {
                        provider: provider.to_string(),
                        model: m.to_string(),
                    });
                }
                m
            }
            None => descriptor.default_model,
        };
        Ok(EmbeddingConfig {
            provider,
            model: model_id.to_string(),
        })
    }

    /// Look up the model descriptor for a resolved config.
    pub fn descriptor(&self, config: &EmbeddingConfig) -> Result<&ModelDescriptor> {
        self.provider_descriptor(config.provider)?
            .models
            .iter()
            .find(|d| d.model_id == config.model)
            .ok_or_else(|| RagError::UnknownModel {
                provider: config.provider.to_string(),
                model: config.model.clone(),
            })
    }

    /// All registered providers, in stable catalog order. Read-only.
    pub fn list_all(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    fn provider_descriptor(&self, provider: Provider) -> Result<&ProviderDescriptor> {
        self.providers
            .iter()
            .find(|d| d.provider == provider)
            .ok_or_else(|| RagError::UnknownProvider(provider.to_string()))
    }
}
