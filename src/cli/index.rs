use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::MailragConfig;
use crate::registry::Provider;
use crate::service::manager::ServiceManager;

/// Build (or extend) the vector index for a (provider, model) pair from a
/// text file: load, chunk, embed, insert.
pub async fn build_index(
    config: &MailragConfig,
    provider: Provider,
    model: Option<&str>,
    data: &Path,
    test_query: Option<&str>,
) -> Result<()> {
    anyhow::ensure!(data.exists(), "data file not found: {}", data.display());

    let manager = ServiceManager::new(config);
    manager
        .configure_rag(provider, model)
        .context("failed to configure embedding model")?;
    let rag = manager.get_rag_service();
    let active = rag
        .current_config()
        .expect("service configured above");

    println!("Indexing {} with {}", data.display(), active);

    let chunks = crate::ingest::load_and_split(
        data,
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
    )?;
    println!(
        "Split into {} chunk(s) (size {}, overlap {})",
        chunks.len(),
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let source = data.to_string_lossy().into_owned();
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    for chunk in &chunks {
        rag.ingest(std::slice::from_ref(chunk), Some(&source))
            .await
            .context("embedding or insert failed")?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Index ready at {}",
        rag.catalog().index_path(&active).display()
    );

    if let Some(query) = test_query {
        println!("\nRunning test query...");
        let results = rag.process_for_context(query, None).await?;
        if results.is_empty() {
            println!("No results found.");
        } else {
            for (i, chunk) in results.iter().enumerate() {
                println!("  {}. (score: {:.4}) {}", i + 1, chunk.score, chunk.content);
            }
        }
    }

    manager.shutdown();
    Ok(())
}
