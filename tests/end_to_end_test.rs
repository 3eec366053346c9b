mod helpers;

use helpers::{last_embed, mock_service};
use mailrag::registry::Provider;
use mailrag::service::manager::ServiceManager;

#[tokio::test]
async fn full_flow_across_a_model_switch() {
    let dir = tempfile::tempdir().unwrap();
    let (service, log) = mock_service(&dir);

    // Configure with ZhipuAI's default model and build up some context.
    service.configure(Provider::Zhipuai, Some("embedding-3")).unwrap();
    service
        .ingest(
            &[
                "示例邮件内容".to_string(),
                "去年的项目进度汇报".to_string(),
                "会议纪要：下周三答辩".to_string(),
            ],
            Some("archive-2025"),
        )
        .await
        .unwrap();

    let results = service
        .process_for_context("示例邮件内容", None)
        .await
        .unwrap();

    // The ZhipuAI model computed a 1024-dim vector and ≤ default-k chunks
    // came back, best first.
    let (model, dims) = last_embed(&log);
    assert_eq!(model, "embedding-3");
    assert_eq!(dims, 1024);
    assert!(!results.is_empty());
    assert!(results.len() <= 3);
    assert_eq!(results[0].content, "示例邮件内容");
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    // Switch to OpenAI and repeat against its own (distinct) index.
    service
        .switch_embedding_model(Provider::Openai, "text-embedding-3-small")
        .unwrap();
    service
        .ingest(&["minutes from the openai-side sync".to_string()], Some("openai"))
        .await
        .unwrap();

    let results = service
        .process_for_context("minutes from the openai-side sync", None)
        .await
        .unwrap();

    let (model, dims) = last_embed(&log);
    assert_eq!(model, "text-embedding-3-small");
    assert_eq!(dims, 1536);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source.as_deref(), Some("openai"));
    // Nothing from the ZhipuAI index leaks across.
    assert!(results.iter().all(|c| c.content != "示例邮件内容"));
}

#[tokio::test]
async fn ingested_context_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (service, _log) = mock_service(&dir);
        service.configure(Provider::Zhipuai, None).unwrap();
        service
            .ingest(&["application deadline is March 1".to_string()], None)
            .await
            .unwrap();
        service.catalog().close_all();
    }

    // A fresh service over the same directory reopens the same index.
    let (service, _log) = mock_service(&dir);
    service.configure(Provider::Zhipuai, None).unwrap();

    let results = service
        .process_for_context("application deadline is March 1", None)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "application deadline is March 1");
}

#[tokio::test]
async fn manager_lifecycle_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = mailrag::config::MailragConfig::default();
    config.storage.db_dir = dir.path().to_string_lossy().into_owned();

    let manager = ServiceManager::new(&config);
    let rag = manager.get_rag_service();
    assert!(!rag.is_configured());

    // The production factory needs a key in the environment.
    std::env::set_var("ZHIPUAI_API_KEY", "test-key");
    manager.configure_rag(Provider::Zhipuai, None).unwrap();
    std::env::remove_var("ZHIPUAI_API_KEY");

    assert!(rag.is_configured());
    assert_eq!(rag.current_config().unwrap().model, "embedding-3");

    // Same instance everywhere, per the single-service lifecycle.
    assert!(std::sync::Arc::ptr_eq(&rag, &manager.get_rag_service()));

    manager.shutdown();
    assert_eq!(rag.catalog().open_count(), 0);
}
