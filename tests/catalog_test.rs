use std::sync::Arc;

use mailrag::error::RagError;
use mailrag::index::catalog::IndexCatalog;
use mailrag::index::IndexStore;
use mailrag::registry::{EmbeddingConfig, Provider};

fn config(provider: Provider, model: &str) -> EmbeddingConfig {
    EmbeddingConfig {
        provider,
        model: model.to_string(),
    }
}

fn spike(dims: usize, seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dims];
    v[seed % dims] = 1.0;
    v
}

#[test]
fn same_config_same_location_and_handle() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = IndexCatalog::new(dir.path());
    let cfg = config(Provider::Zhipuai, "embedding-3");

    let first = catalog.open_or_create(&cfg, 32).unwrap();
    let second = catalog.open_or_create(&cfg, 32).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.path(), catalog.index_path(&cfg));
}

#[test]
fn second_catalog_generation_reopens_prior_data() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(Provider::Zhipuai, "embedding-3");

    // First "process run": build and populate.
    {
        let catalog = IndexCatalog::new(dir.path());
        let store = catalog.open_or_create(&cfg, 32).unwrap();
        store
            .insert(&spike(32, 7), "archived reply about scheduling", None)
            .unwrap();
        catalog.close_all();
    }

    // Second "process run": same config must reopen, not recreate.
    let catalog = IndexCatalog::new(dir.path());
    let store = catalog.open_or_create(&cfg, 32).unwrap();
    assert_eq!(store.len().unwrap(), 1);

    let results = store.query(&spike(32, 7), 3).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "archived reply about scheduling");
}

#[test]
fn reopen_with_incompatible_width_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(Provider::Zhipuai, "embedding-3");

    {
        let catalog = IndexCatalog::new(dir.path());
        catalog.open_or_create(&cfg, 32).unwrap();
    }

    // A new catalog pointing a different-width model at the same file fails.
    let catalog = IndexCatalog::new(dir.path());
    let err = catalog.open_or_create(&cfg, 64).unwrap_err();
    assert!(matches!(err, RagError::DimensionalityMismatch { .. }));
}

#[test]
fn wrong_width_vector_is_rejected_by_insert() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = IndexCatalog::new(dir.path());
    let store = catalog
        .open_or_create(&config(Provider::Zhipuai, "embedding-3"), 32)
        .unwrap();

    let err = store.insert(&spike(64, 0), "too wide", None).unwrap_err();
    assert!(matches!(err, RagError::DimensionalityMismatch { .. }));
    assert!(store.is_empty().unwrap());
}

#[test]
fn empty_index_query_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = IndexCatalog::new(dir.path());
    let store = catalog
        .open_or_create(&config(Provider::Openai, "text-embedding-3-small"), 32)
        .unwrap();

    let results = store.query(&spike(32, 0), 5).unwrap();
    assert!(results.is_empty());
}

#[test]
fn configs_never_share_storage() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = IndexCatalog::new(dir.path());

    let zhipu = catalog
        .open_or_create(&config(Provider::Zhipuai, "embedding-3"), 32)
        .unwrap();
    let openai = catalog
        .open_or_create(&config(Provider::Openai, "text-embedding-3-small"), 48)
        .unwrap();

    zhipu.insert(&spike(32, 1), "zhipu-side chunk", None).unwrap();

    assert_ne!(zhipu.path(), openai.path());
    assert!(openai.is_empty().unwrap());
}

#[test]
fn naming_contract_sanitizes_to_underscores() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = IndexCatalog::new(dir.path());
    let cfg = config(Provider::Openrouter, "openai/text-embedding-3-small");

    let path = catalog.index_path(&cfg);
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "db_openrouter_openai_text_embedding_3_small.sqlite3"
    );
}

#[test]
fn direct_store_open_matches_catalog_behavior() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(Provider::Zhipuai, "embedding-2");
    let path = dir.path().join(cfg.index_file_name());

    let store = IndexStore::open(&path, &cfg, 16).unwrap();
    assert_eq!(store.dimensions(), 16);
    assert_eq!(store.path(), path);
}
