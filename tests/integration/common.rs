//! Shared fixtures: a mock JSON:API server and injected credential sources.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hauler::cli::{Cli, Environment, execute};
use hauler::config::ConfigFileSource;
use hauler::testing::{RecordingEnv, RecordingSecretStore};
use wiremock::MockServer;

/// A commitment whose buyer is included and whose seller is not.
pub const COMMITMENTS: &str = r#"{
    "data": [{
        "id": "1",
        "type": "broker-commitments",
        "attributes": {"status": "active", "label": null},
        "relationships": {
            "buyer": {"data": {"type": "brokers", "id": "5"}},
            "seller": {"data": {"type": "truckers", "id": "9"}}
        }
    }],
    "included": [
        {"id": "5", "type": "brokers", "attributes": {"company-name": "Acme"}}
    ]
}"#;

/// Credential sources and config file for one test.
pub struct Sources {
    pub env: Arc<RecordingEnv>,
    pub store: Arc<RecordingSecretStore>,
    pub config: ConfigFileSource,
}

impl Sources {
    /// No token anywhere.
    pub fn empty() -> Self {
        Self::new(RecordingEnv::new(), RecordingSecretStore::empty())
    }

    /// The given environment and keychain, and no config file.
    pub fn new(env: RecordingEnv, store: RecordingSecretStore) -> Self {
        Self {
            env: Arc::new(env),
            store: Arc::new(store),
            config: ConfigFileSource::default(),
        }
    }

    /// Reads the config file at `path`.
    pub fn with_config_file(mut self, path: &Path) -> Self {
        self.config = ConfigFileSource::new(path);
        self
    }

    /// Builds the CLI environment.
    pub fn environment(&self) -> Environment {
        Environment::new(self.env.clone(), self.store.clone(), self.config.clone())
    }
}

/// Runs the CLI with `args` against `server` and returns stdout.
pub async fn run_cli(server: &MockServer, sources: &Sources, args: &[&str]) -> hauler::Result<String> {
    let uri = server.uri();
    let mut argv = vec!["hauler", "--base-url", uri.as_str()];
    argv.extend_from_slice(args);
    run_argv(&argv, sources).await
}

/// Runs the CLI with the full argument vector and returns stdout.
pub async fn run_argv(argv: &[&str], sources: &Sources) -> hauler::Result<String> {
    let cli = Cli::try_parse_from(argv).map_err(|e| hauler::Error::validation(e.to_string()))?;
    let mut out = Vec::new();
    execute(cli, &sources.environment(), &mut out).await?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// The `Authorization` header of the only request the server received.
pub async fn authorization_of_single_request(server: &MockServer) -> Result<Option<String>> {
    let requests = server
        .received_requests()
        .await
        .context("request recording is disabled")?;
    anyhow::ensure!(requests.len() == 1, "expected one request, got {}", requests.len());
    Ok(requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned))
}
