//! Command handlers.
//!
//! Handlers write to a caller-supplied writer and return typed errors; only
//! [`run`](super::run) prints errors and picks exit codes.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    ConfigSource, Credential, CredentialResolver, EnvSource, KeyringStore, SecretStore, SystemEnv,
};
use crate::client::ApiClient;
use crate::config::{ClientConfig, ConfigFile, ConfigFileSource, resolve_base_url};
use crate::document::Document;
use crate::error::{Error, ErrorKind, Result};
use crate::transport::SparseFieldOverrides;

use super::output::{self, OutputOptions};
use super::registry::{ListOptions, Registry, ResourceDescriptor};
use super::{AuthCommand, Cli, Command, GlobalArgs, ListArgs, ViewAction, ViewArgs};

/// Where credentials and settings come from.
#[derive(Clone)]
pub struct Environment {
    env: Arc<dyn EnvSource>,
    secrets: Arc<dyn SecretStore>,
    config: ConfigFileSource,
}

impl Environment {
    /// Creates an environment over explicit sources.
    pub fn new(
        env: Arc<dyn EnvSource>,
        secrets: Arc<dyn SecretStore>,
        config: ConfigFileSource,
    ) -> Self {
        Self {
            env,
            secrets,
            config,
        }
    }

    /// The process environment, the OS credential store and the default
    /// config file.
    pub fn system() -> Self {
        Self::new(
            Arc::new(SystemEnv),
            Arc::new(KeyringStore),
            ConfigFileSource::system(),
        )
    }

    fn config_file(&self) -> Option<ConfigFile> {
        match self.config.load() {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring config file for base URL");
                None
            }
        }
    }

    fn resolver(&self, base_url: &str) -> CredentialResolver {
        let config: Arc<dyn ConfigSource> = Arc::new(self.config.clone());
        CredentialResolver::new(base_url, self.env.clone(), self.secrets.clone(), config)
    }
}

/// Whether a command may run without a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthPolicy {
    Required,
    Optional,
}

/// Runs a parsed command line.
pub async fn execute(cli: Cli, environment: &Environment, out: &mut dyn Write) -> Result<()> {
    let registry = Registry::builtin();
    let Cli { global, command } = cli;

    match command {
        Command::View(ViewArgs {
            resource,
            action: None,
        }) if resource == "resources" => list_resources(out, &registry),
        Command::View(ViewArgs {
            resource,
            action: None,
        }) => Err(Error::validation(format!(
            "missing action for '{}' (expected `list` or `show <id>`)",
            resource
        ))),
        Command::View(ViewArgs {
            resource,
            action: Some(ViewAction::List(args)),
        }) => {
            let descriptor = registry.get(&resource)?;
            list(out, descriptor, &global, args, environment).await
        }
        Command::View(ViewArgs {
            resource,
            action: Some(ViewAction::Show(args)),
        }) => {
            let descriptor = registry.get(&resource)?;
            show(out, descriptor, &global, &args.id, environment).await
        }
        Command::Auth(AuthCommand::Status) => auth_status(out, &global, environment),
    }
}

async fn list(
    out: &mut dyn Write,
    descriptor: &ResourceDescriptor,
    global: &GlobalArgs,
    args: ListArgs,
    environment: &Environment,
) -> Result<()> {
    let overrides = overrides(global);
    let query = descriptor.list_query(
        &overrides,
        &ListOptions {
            filters: args.filters,
            limit: Some(args.limit),
            offset: args.offset,
            sort: args.sort,
        },
    )?;

    let client = connect(global, environment, AuthPolicy::Required)?;
    let document = client
        .fetch_collection(descriptor.path(), &query)
        .await?;
    output::render_list(out, descriptor, &document, output_options(global, &overrides))
}

async fn show(
    out: &mut dyn Write,
    descriptor: &ResourceDescriptor,
    global: &GlobalArgs,
    id: &str,
    environment: &Environment,
) -> Result<()> {
    let path = descriptor.member_path(id)?;
    let overrides = overrides(global);
    let query = descriptor.show_query(&overrides);

    let client = connect(global, environment, AuthPolicy::Optional)?;
    let document: Document = client.fetch_single(&path, &query).await?;
    output::render_detail(out, descriptor, &document, output_options(global, &overrides))
}

fn list_resources(out: &mut dyn Write, registry: &Registry) -> Result<()> {
    let rows: Vec<Vec<String>> = registry
        .iter()
        .map(|d| {
            vec![
                d.name().to_owned(),
                d.path().to_owned(),
                d.summary().to_owned(),
            ]
        })
        .collect();
    output::write_table(out, &["Name", "Path", "Description"], &rows)
}

fn auth_status(out: &mut dyn Write, global: &GlobalArgs, environment: &Environment) -> Result<()> {
    let base_url = base_url(global, environment);
    let resolver = environment.resolver(&base_url);

    writeln!(out, "Base URL: {}", base_url)?;
    writeln!(out, "Account: {}", resolver.account())?;
    if global.no_auth {
        writeln!(out, "Source: none (--no-auth)")?;
        return Ok(());
    }

    let credential = resolver.resolve(global.token.as_deref())?;
    writeln!(out, "Source: {}", credential.provenance())?;
    Ok(())
}

fn base_url(global: &GlobalArgs, environment: &Environment) -> String {
    resolve_base_url(
        global.base_url.as_deref(),
        environment.env.as_ref(),
        environment.config_file().as_ref(),
    )
}

fn connect(global: &GlobalArgs, environment: &Environment, policy: AuthPolicy) -> Result<ApiClient> {
    let base_url = base_url(global, environment);
    let credential = credential(global, environment, &base_url, policy)?;

    let config = ClientConfig::builder()
        .base_url(base_url)
        .maybe_timeout(global.timeout.map(Duration::from_secs))
        .build();
    ApiClient::new(&config, credential)
}

fn credential(
    global: &GlobalArgs,
    environment: &Environment,
    base_url: &str,
    policy: AuthPolicy,
) -> Result<Option<Credential>> {
    if global.no_auth {
        tracing::debug!("credential lookup skipped");
        return Ok(None);
    }

    match environment.resolver(base_url).resolve(global.token.as_deref()) {
        Ok(credential) => Ok(Some(credential)),
        Err(e) if e.kind() == ErrorKind::CredentialNotFound && policy == AuthPolicy::Optional => {
            tracing::info!("no credential found, continuing unauthenticated");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn overrides(global: &GlobalArgs) -> SparseFieldOverrides {
    SparseFieldOverrides::from_flags(global.fields.as_deref(), global.include.as_deref())
}

fn output_options(global: &GlobalArgs, overrides: &SparseFieldOverrides) -> OutputOptions {
    OutputOptions {
        json: global.json,
        omit_null: global.omit_null,
        sparse: global.json && overrides.fields_set(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::testing::{RecordingEnv, RecordingSecretStore};

    fn environment(store: RecordingSecretStore) -> (Environment, Arc<RecordingSecretStore>) {
        let store = Arc::new(store);
        let env = Environment::new(
            Arc::new(RecordingEnv::new()),
            store.clone(),
            ConfigFileSource::default(),
        );
        (env, store)
    }

    async fn run(args: &[&str], environment: &Environment) -> Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        execute(cli, environment, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_view_resources() {
        let (env, _) = environment(RecordingSecretStore::empty());
        let text = run(&["hauler", "view", "resources"], &env).await.unwrap();
        assert!(text.starts_with("NAME"));
        assert!(text.contains("broker-commitments  /v1/broker-commitments"));
    }

    #[tokio::test]
    async fn test_blank_id_fails_before_credentials() {
        let (env, store) = environment(RecordingSecretStore::empty());
        let err = run(&["hauler", "view", "users", "show", " "], &env)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_filter_fails_before_credentials() {
        let (env, store) = environment(RecordingSecretStore::empty());
        let err = run(
            &["hauler", "view", "users", "list", "--filter", "color=red"],
            &env,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_action() {
        let (env, _) = environment(RecordingSecretStore::empty());
        let err = run(&["hauler", "view", "users"], &env).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_requires_credential() {
        let (env, store) = environment(RecordingSecretStore::empty());
        let err = run(&["hauler", "view", "users", "list"], &env)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialNotFound);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_fails_show() {
        let (env, _) = environment(RecordingSecretStore::failing("keychain locked"));
        let err = run(&["hauler", "view", "users", "show", "1"], &env)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialBackend);
    }

    #[test]
    fn test_auth_status_reports_provenance_only() {
        let (env, _) = environment(RecordingSecretStore::with_secret("s3cret"));
        let cli = Cli::try_parse_from([
            "hauler",
            "--base-url",
            "https://App.Example.com/",
            "auth",
            "status",
        ])
        .unwrap();
        let mut out = Vec::new();
        auth_status(&mut out, &cli.global, &env).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Base URL: https://App.Example.com\nAccount: https://app.example.com\nSource: keychain\n"
        );
        assert!(!text.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_auth_status_with_no_auth_skips_lookup() {
        let (env, store) = environment(RecordingSecretStore::with_secret("s3cret"));
        let text = run(
            &[
                "hauler",
                "--no-auth",
                "--base-url",
                "https://app.example.com",
                "auth",
                "status",
            ],
            &env,
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "Base URL: https://app.example.com\nAccount: https://app.example.com\nSource: none (--no-auth)\n"
        );
        assert_eq!(store.calls(), 0);
    }
}
