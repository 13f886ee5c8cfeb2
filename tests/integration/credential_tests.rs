//! Credential resolution as seen by the server.

use std::fs;

use hauler::ErrorKind;
use hauler::auth::{TOKEN_ENV, TOKEN_ENV_ALIAS, account_key};
use hauler::cli::exit_code;
use hauler::testing::{RecordingEnv, RecordingSecretStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{COMMITMENTS, Sources, authorization_of_single_request, run_argv, run_cli};

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/broker-commitments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COMMITMENTS))
        .mount(&server)
        .await;
    server
}

fn write_config(dir: &TempDir, contents: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, contents.to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_explicit_token_wins() {
    let server = server().await;
    let sources = Sources::new(
        RecordingEnv::new().with(TOKEN_ENV, "from-env"),
        RecordingSecretStore::with_secret("from-keychain"),
    );

    run_cli(
        &server,
        &sources,
        &["--token", "from-flag", "view", "broker-commitments", "list"],
    )
    .await
    .unwrap();

    assert_eq!(
        authorization_of_single_request(&server).await.unwrap().as_deref(),
        Some("Bearer from-flag")
    );
    assert_eq!(sources.store.calls(), 0);
}

#[tokio::test]
async fn test_env_alias_used_when_primary_blank() {
    let server = server().await;
    let sources = Sources::new(
        RecordingEnv::new()
            .with(TOKEN_ENV, "  ")
            .with(TOKEN_ENV_ALIAS, "abc"),
        RecordingSecretStore::with_secret("from-keychain"),
    );

    run_cli(&server, &sources, &["view", "broker-commitments", "list"])
        .await
        .unwrap();

    assert_eq!(
        authorization_of_single_request(&server).await.unwrap().as_deref(),
        Some("Bearer abc")
    );
    assert_eq!(sources.store.calls(), 0);
}

#[tokio::test]
async fn test_keychain_lookup_uses_account_key() {
    let server = server().await;
    let sources = Sources::new(RecordingEnv::new(), RecordingSecretStore::with_secret("kc"));

    run_cli(&server, &sources, &["view", "broker-commitments", "list"])
        .await
        .unwrap();

    assert_eq!(
        sources.store.lookups(),
        vec![("hauler".to_owned(), account_key(&server.uri()))]
    );
    assert_eq!(
        authorization_of_single_request(&server).await.unwrap().as_deref(),
        Some("Bearer kc")
    );
}

#[tokio::test]
async fn test_config_file_token_for_account() {
    let server = server().await;
    let dir = TempDir::new().unwrap();
    let mut tokens = serde_json::Map::new();
    tokens.insert(account_key(&server.uri()), json!("account-token"));
    let config = write_config(&dir, &json!({"token": "default-token", "tokens": tokens}));
    let sources = Sources::empty().with_config_file(&config);

    run_cli(&server, &sources, &["view", "broker-commitments", "list"])
        .await
        .unwrap();

    assert_eq!(
        authorization_of_single_request(&server).await.unwrap().as_deref(),
        Some("Bearer account-token")
    );
}

#[tokio::test]
async fn test_base_url_and_token_from_config_file() {
    let server = server().await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &json!({"base_url": server.uri(), "token": "file-token"}));
    let sources = Sources::empty().with_config_file(&config);

    run_argv(&["hauler", "view", "broker-commitments", "list"], &sources)
        .await
        .unwrap();

    assert_eq!(
        authorization_of_single_request(&server).await.unwrap().as_deref(),
        Some("Bearer file-token")
    );
}

#[tokio::test]
async fn test_keychain_failure_is_not_masked_by_config_file() {
    let server = server().await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &json!({"token": "stale"}));
    let sources = Sources::new(
        RecordingEnv::new(),
        RecordingSecretStore::failing("keychain is locked"),
    )
    .with_config_file(&config);

    let err = run_cli(&server, &sources, &["view", "broker-commitments", "list"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialBackend);
    assert_eq!(exit_code(&err), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_config_file_is_backend_error() {
    let server = server().await;
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();
    let sources = Sources::empty().with_config_file(&config);

    let err = run_cli(&server, &sources, &["view", "broker-commitments", "list"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialBackend);
}

#[tokio::test]
async fn test_auth_status_without_credential() {
    let server = MockServer::start().await;
    let err = run_cli(&server, &Sources::empty(), &["auth", "status"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialNotFound);
    assert_eq!(exit_code(&err), 3);
}

#[tokio::test]
async fn test_auth_status_reports_source() {
    let server = MockServer::start().await;
    let sources = Sources::new(
        RecordingEnv::new().with(TOKEN_ENV, "secret-token"),
        RecordingSecretStore::empty(),
    );

    let out = run_cli(&server, &sources, &["auth", "status"]).await.unwrap();

    assert!(out.contains("Source: env"));
    assert!(!out.contains("secret-token"));
    assert!(server.received_requests().await.unwrap().is_empty());
}
