//! Provider-agnostic email RAG core.
//!
//! mailrag retrieves semantically relevant prior context for an incoming
//! email by embedding its text and querying a persisted vector index. The
//! embedding model, its dimensionality, and the backing index are swappable
//! at runtime without touching call sites: callers ask a [`service::RagService`]
//! for "context for this text" and the service routes the request through
//! whatever (provider, model) pair is currently active.
//!
//! # Architecture
//!
//! - **Registry**: a compiled-in catalog of providers (ZhipuAI, OpenAI,
//!   OpenRouter), their models, and vector widths
//! - **Embedding**: one HTTP client per (provider, model) pair, all speaking
//!   the OpenAI-compatible `/embeddings` wire format
//! - **Storage**: one SQLite file per (provider, model) with
//!   [sqlite-vec](https://github.com/asg017/sqlite-vec) for vector KNN —
//!   vectors of different widths never share an index
//! - **Switching**: the active (config, client, index) session is replaced
//!   with a single atomic reference swap; in-flight queries finish on the
//!   session they started with
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`registry`] — Static provider/model catalog and config resolution
//! - [`embedding`] — Embedding clients and the factory seam
//! - [`index`] — Per-model sqlite-vec index stores and the handle catalog
//! - [`service`] — The RAG façade and process-wide service manager
//! - [`ingest`] — Document loading and chunking glue
//! - [`error`] — The [`error::RagError`] taxonomy

pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod ingest;
pub mod registry;
pub mod service;
