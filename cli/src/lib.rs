//! Command surface of the `port-migrator` binary.
//!
//! ## Commands
//!
//! - `port-migrator migrate <BLUEPRINT> | --all [--dry-run]`
//! - `port-migrator get-blueprints [--include-empty]`
//! - `port-migrator get-diff <SOURCE> <TARGET> [--show-diffs] [--limit N] [--output FILE]`
//!
//! Connection settings are global and fall back to environment variables,
//! which may also come from a `.env` file in the working directory.

mod blueprints_cmd;
mod diff_cmd;
mod migrate_cmd;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use port_migrator_client::{DEFAULT_BASE_URL, PortClient};
use port_migrator_core::{ConfigInput, MigratorConfig};

#[derive(Debug, Parser)]
#[command(
    name = "port-migrator",
    version,
    about = "Move Port catalog entities from the GitHub app to the GitHub Ocean integration"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings shared by every command.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Port API base URL.
    #[arg(long, env = "PORT_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub port_url: String,

    /// Port client ID.
    #[arg(long, env = "PORT_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Port client secret.
    #[arg(long, env = "PORT_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// Installation ID of the legacy GitHub app.
    #[arg(long, env = "OLD_INSTALLATION_ID", global = true)]
    pub old_installation_id: Option<String>,

    /// Installation ID of the GitHub Ocean integration.
    #[arg(long, env = "NEW_INSTALLATION_ID", global = true)]
    pub new_installation_id: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn config_input(&self) -> ConfigInput {
        ConfigInput {
            port_url: Some(self.port_url.clone()),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            old_installation_id: self.old_installation_id.clone(),
            new_installation_id: self.new_installation_id.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reassign legacy-owned entities to the Ocean integration.
    Migrate(MigrateArgs),
    /// List blueprints the legacy installation ingested into.
    GetBlueprints(GetBlueprintsArgs),
    /// Compare legacy-owned and Ocean-owned entities of two blueprints.
    GetDiff(GetDiffArgs),
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Blueprint to migrate.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub blueprint: Option<String>,

    /// Migrate every blueprint the legacy installation owns entities in.
    #[arg(long)]
    pub all: bool,

    /// Count and confirm, but do not patch anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct GetBlueprintsArgs {
    /// Also list blueprints with no legacy-owned entities.
    #[arg(long)]
    pub include_empty: bool,
}

#[derive(Debug, Args)]
pub struct GetDiffArgs {
    /// Blueprint holding the legacy-owned entities.
    pub source_blueprint: String,

    /// Blueprint holding the Ocean-owned entities.
    pub target_blueprint: String,

    /// Print field-level differences of changed entities.
    #[arg(long)]
    pub show_diffs: bool,

    /// Maximum number of changed entities to print with --show-diffs.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Write the full comparison as JSON to this file.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Run the parsed command. `Ok(false)` means the command finished but
/// should exit non-zero.
pub async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Migrate(args) => migrate_cmd::run(&cli.global, args).await,
        Command::GetBlueprints(args) => blueprints_cmd::run(&cli.global, &args).await,
        Command::GetDiff(args) => diff_cmd::run(&cli.global, &args).await,
    }
}

fn connect(config: &MigratorConfig) -> anyhow::Result<PortClient> {
    PortClient::new(&config.port_url, config.credentials.clone())
        .context("failed to build HTTP client")
}
