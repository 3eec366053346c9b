use anyhow::{Context, Result};

use crate::config::MailragConfig;
use crate::registry::Provider;
use crate::service::manager::ServiceManager;

/// Run a retrieval from the terminal against one (provider, model) index.
pub async fn search(
    config: &MailragConfig,
    provider: Provider,
    model: Option<&str>,
    query: &str,
    k: Option<usize>,
) -> Result<()> {
    let manager = ServiceManager::new(config);
    manager
        .configure_rag(provider, model)
        .context("failed to configure embedding model")?;
    let rag = manager.get_rag_service();

    let results = rag.process_for_context(query, k).await?;

    if results.is_empty() {
        println!("No results found.");
        manager.shutdown();
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());

    for (i, chunk) in results.iter().enumerate() {
        let preview = if chunk.content.chars().count() > 120 {
            let truncated: String = chunk.content.chars().take(120).collect();
            format!("{truncated}...")
        } else {
            chunk.content.clone()
        };

        match &chunk.source {
            Some(source) => println!(
                "  {}. (score: {:.4}, source: {}) {}",
                i + 1,
                chunk.score,
                source,
                preview
            ),
            None => println!("  {}. (score: {:.4}) {}", i + 1, chunk.score, preview),
        }
        println!();
    }

    manager.shutdown();
    Ok(())
}
