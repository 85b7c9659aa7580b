use std::process::ExitCode;

use clap::Parser;
use port_migrator_cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Environment variables that are already set win over `.env`.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match port_migrator_cli::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
