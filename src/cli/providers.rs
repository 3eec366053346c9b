use anyhow::Result;

use crate::registry::EmbeddingProviderRegistry;

/// Print the provider/model catalog.
pub fn list_providers() -> Result<()> {
    let registry = EmbeddingProviderRegistry::builtin();

    for descriptor in registry.list_all() {
        println!("{}:", descriptor.provider);
        for model in &descriptor.models {
            let default_marker = if model.model_id == descriptor.default_model {
                " (default)"
            } else {
                ""
            };
            match model.routing_note {
                Some(note) => println!(
                    "  {} — {} dims{}, {}",
                    model.model_id, model.dimensions, default_marker, note
                ),
                None => println!(
                    "  {} — {} dims{}",
                    model.model_id, model.dimensions, default_marker
                ),
            }
        }
        println!();
    }

    Ok(())
}
