mod cli;
mod config;
mod embedding;
mod error;
mod index;
mod ingest;
mod registry;
mod service;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use registry::Provider;

#[derive(Parser)]
#[command(
    name = "mailrag",
    version,
    about = "Provider-agnostic email RAG — build and query per-model vector indexes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build (or extend) the vector index for a provider/model from a text file
    Index {
        /// Embedding provider (zhipuai, openai, openrouter)
        #[arg(long)]
        provider: String,
        /// Model id; defaults to the provider's default model
        #[arg(long)]
        model: Option<String>,
        /// Path to the source text file
        #[arg(long)]
        data: PathBuf,
        /// Chunk size in characters (overrides config)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Chunk overlap in characters (overrides config)
        #[arg(long)]
        chunk_overlap: Option<usize>,
        /// Run a retrieval with this query after indexing
        #[arg(long)]
        test_query: Option<String>,
    },
    /// Retrieve context chunks for a piece of text
    Search {
        /// Embedding provider; defaults to the configured one
        #[arg(long)]
        provider: Option<String>,
        /// Model id; defaults to the configured/provider default
        #[arg(long)]
        model: Option<String>,
        /// Number of chunks to retrieve
        #[arg(short, long)]
        k: Option<usize>,
        /// The query text
        query: String,
    },
    /// List registered embedding providers and their models
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env for provider API keys; absence is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = config::MailragConfig::load()?;

    // Log to stderr so stdout stays clean for piped output.
    let filter = EnvFilter::try_new(&config.service.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Index {
            provider,
            model,
            data,
            chunk_size,
            chunk_overlap,
            test_query,
        } => {
            let provider: Provider = provider.parse()?;
            if let Some(size) = chunk_size {
                config.chunking.chunk_size = size;
            }
            if let Some(overlap) = chunk_overlap {
                config.chunking.chunk_overlap = overlap;
            }
            cli::index::build_index(
                &config,
                provider,
                model.as_deref(),
                &data,
                test_query.as_deref(),
            )
            .await?;
        }
        Command::Search {
            provider,
            model,
            k,
            query,
        } => {
            let provider = match provider {
                Some(p) => p.parse()?,
                None => config.embedding.provider,
            };
            let model = match &model {
                Some(m) => Some(m.as_str()),
                None if provider == config.embedding.provider => config.default_model(),
                None => None,
            };
            cli::search::search(&config, provider, model, &query, k).await?;
        }
        Command::Providers => {
            cli::providers::list_providers()?;
        }
    }

    Ok(())
}
