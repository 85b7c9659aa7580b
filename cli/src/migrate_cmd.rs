use anyhow::Context;
use port_migrator_core::migrate::render_report;
use port_migrator_core::{
    BlueprintScope, CommandKind, MigrationRequest, Migrator, StdinConfirmer,
};
use tracing::info;

use crate::{GlobalArgs, MigrateArgs, connect};

pub(crate) async fn run(global: &GlobalArgs, args: MigrateArgs) -> anyhow::Result<bool> {
    let config = global.config_input().resolve(CommandKind::Migrate)?;
    let new_installation_id = config.new_installation_id()?;
    let client = connect(&config)?;

    let scope = match args.blueprint {
        Some(blueprint) => BlueprintScope::Single(blueprint),
        None => BlueprintScope::All,
    };
    info!(
        old = %config.old_installation_id,
        new = %new_installation_id,
        dry_run = args.dry_run,
        "starting migration"
    );

    let confirmer = StdinConfirmer;
    let report = Migrator::new(
        &client,
        &confirmer,
        config.old_installation_id.as_str(),
        new_installation_id,
    )
    .run(&MigrationRequest {
        scope,
        dry_run: args.dry_run,
    })
    .await
    .context("migration aborted")?;

    println!();
    print!("{}", render_report(&report));
    Ok(report.succeeded())
}
