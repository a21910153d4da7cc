//! Integration tests for the token lifecycle
//!
//! These tests drive the public API against a mock identity service and
//! persist the record through the configuration layer between steps, the
//! way consecutive CLI invocations do.

use chrono::{Duration, Utc};
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;
use tempfile::TempDir;

use conoha_ojs::app::record::format_storage_time;
use conoha_ojs::app::{authenticate_record, ensure_fresh_token, CredentialRecord, IdentityClient};
use conoha_ojs::config::AppConfig;
use conoha_ojs::errors::{AppError, AuthError};

fn token_body(token: &str, expires: &str) -> serde_json::Value {
    json!({
        "access": {
            "token": {"id": token, "expires": expires},
            "serviceCatalog": [
                {"type": "identity", "endpoints": [{"publicURL": "https://identity.example/v2.0"}]},
                {"type": "object-store", "endpoints": [{"publicURL": "https://object-storage.example/v1/AUTH_tenant"}]}
            ]
        }
    })
}

#[tokio::test]
async fn test_authenticate_save_reload_and_reuse() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2.0/tokens")
                .json_body(json!({
                    "auth": {
                        "tenantId": "tenant",
                        "passwordCredentials": {"username": "user", "password": "secret"}
                    }
                }));
            then.status(200)
                .json_body(token_body("token-1", "2099-06-01T12:00:00Z"));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let client = IdentityClient::new().unwrap();

    // First invocation: explicit authentication, then save
    let mut config = AppConfig::default();
    let record = CredentialRecord {
        auth_url: server.url("/v2.0"),
        ..CredentialRecord::new("user", "secret", "tenant")
    };
    config.account = authenticate_record(&record, &client).await.unwrap();
    config.save(&config_path).await.unwrap();
    assert_eq!(mock.hits_async().await, 1);

    // Second invocation: reload and reuse without network traffic
    let (reloaded, path) = AppConfig::load(Some(config_path.clone())).await.unwrap();
    assert_eq!(path, config_path);
    assert_eq!(reloaded.account.token, "token-1");
    assert_eq!(reloaded.account.token_expires, "Mon, 01 Jun 2099 12:00:00 UTC");
    assert_eq!(
        reloaded.account.endpoint_url,
        "https://object-storage.example/v1/AUTH_tenant"
    );

    let outcome = ensure_fresh_token(&reloaded.account, &client).await.unwrap();
    assert!(!outcome.was_refreshed());
    assert_eq!(outcome.record(), &reloaded.account);
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/tokens");
            then.status(200)
                .json_body(token_body("token-2", "2099-06-01T12:00:00Z"));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let client = IdentityClient::new().unwrap();

    let mut config = AppConfig::default();
    config.account = CredentialRecord {
        auth_url: server.base_url(),
        token: "token-1".to_string(),
        token_expires: format_storage_time(Utc::now() - Duration::minutes(5)),
        endpoint_url: "https://object-storage.example/v1/AUTH_tenant".to_string(),
        ..CredentialRecord::new("user", "secret", "tenant")
    };
    config.save(&config_path).await.unwrap();

    let (loaded, _) = AppConfig::load(Some(config_path.clone())).await.unwrap();
    let outcome = ensure_fresh_token(&loaded.account, &client).await.unwrap();
    assert!(outcome.was_refreshed());
    assert_eq!(outcome.record().token, "token-2");
    mock.assert_async().await;

    // The caller persists the refreshed record; the next call is cached
    let mut updated = loaded.clone();
    updated.account = outcome.into_record();
    updated.save(&config_path).await.unwrap();

    let (reloaded, _) = AppConfig::load(Some(config_path)).await.unwrap();
    let outcome = ensure_fresh_token(&reloaded.account, &client).await.unwrap();
    assert!(!outcome.was_refreshed());
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_rejected_credentials_leave_saved_record_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/tokens");
            then.status(401).json_body(json!({
                "error": {
                    "message": "The request you have made requires authentication.",
                    "code": 401,
                    "title": "Unauthorized"
                }
            }));
        })
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let client = IdentityClient::new().unwrap();

    let mut config = AppConfig::default();
    config.account = CredentialRecord {
        auth_url: server.base_url(),
        ..CredentialRecord::new("user", "wrong", "tenant")
    };
    config.save(&config_path).await.unwrap();

    let error = ensure_fresh_token(&config.account, &client)
        .await
        .unwrap_err();
    match &error {
        AuthError::HttpStatus { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(
                message,
                "The request you have made requires authentication."
            );
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }

    let app_error = AppError::from(error);
    assert!(!app_error.is_recoverable());
    assert!(app_error.to_string().starts_with("Return 401 status code"));

    let (reloaded, _) = AppConfig::load(Some(config_path)).await.unwrap();
    assert_eq!(reloaded, config);
}
