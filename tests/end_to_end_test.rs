//! End-to-end tests over a real listener using the SDK client.

use serde_json::json;
use settings_manager::config::StorageBackend;
use settings_sdk::{SdkError, SettingsClient};

mod common;

#[tokio::test]
async fn test_update_and_read_back() {
    let server = common::spawn_server(common::test_config()).await;
    let client = SettingsClient::new(&server.url()).with_api_key(common::API_KEY);

    let result = client
        .update_settings(&json!({
            "general": {"site_name": "Docs", "email_id": " admin@example.com "},
            "advanced": {"cache_duration": "45"}
        }))
        .await
        .unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.document["general"]["email_id"], "admin@example.com");
    assert_eq!(result.document["advanced"]["cache_duration"], 45);

    let current = client.get_settings().await.unwrap();
    assert_eq!(current, result.document);

    server.stop().await;
}

#[tokio::test]
async fn test_rejected_field_falls_back_to_current() {
    let server = common::spawn_server(common::test_config()).await;
    let client = SettingsClient::new(&server.url()).with_api_key(common::API_KEY);

    client
        .update_settings(&json!({"general": {"email_id": "a@b.com"}}))
        .await
        .unwrap();
    let result = client
        .update_settings(&json!({"general": {"email_id": "not-an-email"}}))
        .await
        .unwrap();

    assert_eq!(result.document["general"]["email_id"], "a@b.com");
    assert_eq!(
        result.errors,
        vec!["general.email_id: Invalid value for email_id in section general.".to_string()]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_update_without_key_is_refused() {
    let server = common::spawn_server(common::test_config()).await;
    let anonymous = SettingsClient::new(&server.url());

    let before = anonymous.get_settings().await.unwrap();
    let err = anonymous
        .update_settings(&json!({"general": {"site_name": "Hacked"}}))
        .await
        .unwrap_err();
    match err {
        SdkError::Api { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body.code, "rest_forbidden");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(anonymous.get_settings().await.unwrap(), before);

    server.stop().await;
}

#[tokio::test]
async fn test_empty_admin_key_refuses_everyone() {
    let mut config = common::test_config();
    config.admin.api_key = String::new();
    let server = common::spawn_server(config).await;

    let client = SettingsClient::new(&server.url()).with_api_key("");
    let err = client
        .update_settings(&json!({"general": {"site_name": "x"}}))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Api { ref body, .. } if body.code == "rest_forbidden"));

    server.stop().await;
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config();
    config.storage.backend = StorageBackend::File;
    config.storage.directory = dir.path().to_string_lossy().into_owned();

    let server = common::spawn_server(config.clone()).await;
    SettingsClient::new(&server.url())
        .with_api_key(common::API_KEY)
        .update_settings(&json!({"general": {"enable_feature": true}}))
        .await
        .unwrap();
    server.stop().await;

    assert!(dir.path().join("plugin_settings.json").exists());

    let server = common::spawn_server(config).await;
    let current = SettingsClient::new(&server.url()).get_settings().await.unwrap();
    assert_eq!(current["general"]["enable_feature"], true);
    assert_eq!(current["advanced"]["cache_duration"], 60);
    server.stop().await;
}

#[tokio::test]
async fn test_hand_edited_record_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("plugin_settings.json"),
        r#"{"general":{"site_name":"Old","enable_feature":"1","legacy":true}}"#,
    )
    .unwrap();

    let mut config = common::test_config();
    config.storage.backend = StorageBackend::File;
    config.storage.directory = dir.path().to_string_lossy().into_owned();
    let server = common::spawn_server(config).await;

    let current = SettingsClient::new(&server.url()).get_settings().await.unwrap();
    assert_eq!(
        current,
        json!({
            "general": {"site_name": "Old", "email_id": "", "enable_feature": true},
            "advanced": {"api_key": "", "cache_duration": 60}
        })
    );

    server.stop().await;
}

#[tokio::test]
async fn test_schema_via_sdk() {
    let server = common::spawn_server(common::test_config()).await;
    let schema = SettingsClient::new(&server.url()).get_schema().await.unwrap();
    assert_eq!(
        schema["properties"]["general"]["properties"]["enable_feature"]["type"],
        "boolean"
    );
    server.stop().await;
}
