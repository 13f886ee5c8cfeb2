//! The `hauler` command line.
//!
//! ```text
//! hauler [global flags] view <resource> list [--filter k=v]... [--limit N] [--offset N] [--sort S]
//! hauler [global flags] view <resource> show <id>
//! hauler [global flags] view resources
//! hauler [global flags] auth status
//! ```
//!
//! Exit codes: `0` success, `1` failure, `2` invalid input, `3` no credential
//! found.

pub mod commands;
pub mod logging;
pub mod output;
pub mod registry;
mod resources;

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};

use crate::error::{Error, ErrorKind};

pub use commands::{Environment, execute};
pub use registry::{ListOptions, Registry, ResourceDescriptor};

/// Default `--limit` for `list`.
pub const DEFAULT_LIMIT: u32 = 50;

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(name = "hauler", version, about = "Browse JSON:API resources from the terminal")]
pub struct Cli {
    /// Flags shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted anywhere on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// API base URL (default: HAULER_BASE_URL, then the config file).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token; skips every other credential source.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Send requests without looking up a credential.
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    /// Drop null and empty values from JSON rows.
    #[arg(long, global = true)]
    pub omit_null: bool,

    /// Comma-separated fields to request for the primary resource. With
    /// `--json`, the server's response is echoed as-is.
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// Comma-separated relationships to include.
    #[arg(long, global = true)]
    pub include: Option<String>,

    /// Request timeout in seconds (at least 1).
    #[arg(
        long,
        global = true,
        env = "HAULER_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read resources.
    View(ViewArgs),
    /// Credential commands.
    #[command(subcommand)]
    Auth(AuthCommand),
}

/// `view <resource> <action>`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Resource name, or `resources` to list them.
    pub resource: String,

    /// What to do with the resource.
    #[command(subcommand)]
    pub action: Option<ViewAction>,
}

/// Actions on one resource.
#[derive(Debug, Subcommand)]
pub enum ViewAction {
    /// List resources.
    List(ListArgs),
    /// Show one resource.
    Show(ShowArgs),
}

/// Flags for `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter as `name=value`; repeatable.
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Page size.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Page offset.
    #[arg(long)]
    pub offset: Option<u32>,

    /// Sort order, e.g. `-created-at`.
    #[arg(long)]
    pub sort: Option<String>,
}

/// Arguments for `show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Resource id.
    pub id: String,
}

/// `auth` subcommands.
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Report which credential source would be used.
    Status,
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing filter name in '{}'", raw));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

/// Maps an error to the process exit code.
pub fn exit_code(err: &Error) -> i32 {
    match err.kind() {
        ErrorKind::Validation => 2,
        ErrorKind::CredentialNotFound => 3,
        _ => 1,
    }
}

/// Writes a user-facing error report.
pub fn report(out: &mut dyn Write, err: &Error) -> io::Result<()> {
    if let Some(body) = err.body().filter(|_| err.kind() != ErrorKind::Validation) {
        writeln!(out, "{}", body)?;
    }
    writeln!(out, "error: {}", err)?;
    if err.kind() == ErrorKind::CredentialNotFound {
        writeln!(
            out,
            "hint: run `hauler auth login`, pass --token, or set HAULER_TOKEN"
        )?;
    }
    Ok(())
}

/// Parses the command line, runs it, and returns the exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return 1;
        }
    };

    let environment = Environment::system();
    let mut stdout = io::stdout().lock();
    let result = runtime.block_on(execute(cli, &environment, &mut stdout));
    let _ = stdout.flush();

    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = report(&mut io::stderr().lock(), &err);
            exit_code(&err)
        }
    }
}
