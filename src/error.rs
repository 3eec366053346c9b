//! Error taxonomy for the RAG core.
//!
//! Every fallible core operation returns [`RagError`]. Errors surface
//! synchronously to the immediate caller; nothing is retried or swallowed,
//! and a failed operation never leaves a half-constructed session behind.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    /// The provider id is not in the registry.
    #[error("unknown embedding provider: {0}")]
    UnknownProvider(String),

    /// The model id is not in the named provider's supported set.
    #[error("unknown model '{model}' for provider '{provider}'")]
    UnknownModel { provider: String, model: String },

    /// An existing index stores vectors of a different width than the
    /// requested model produces. Never auto-migrated.
    #[error(
        "index at {} stores {stored}-dim vectors, but '{model}' produces {expected}-dim",
        .path.display()
    )]
    DimensionalityMismatch {
        path: PathBuf,
        stored: usize,
        expected: usize,
        model: String,
    },

    /// External embedding call failed: auth, quota, transport, or a
    /// malformed/short response.
    #[error("embedding provider error: {0}")]
    Provider(String),

    /// `process_for_context` or `ingest` called before `configure`.
    #[error("RAG service is not configured; call configure() first")]
    NotConfigured,

    /// Malformed caller input (zero `k`, empty text, bad chunking params).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        RagError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
