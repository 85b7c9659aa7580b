use anyhow::Context;
use port_migrator_core::{CommandKind, blueprint_inventory, render_inventory};

use crate::{GetBlueprintsArgs, GlobalArgs, connect};

pub(crate) async fn run(global: &GlobalArgs, args: &GetBlueprintsArgs) -> anyhow::Result<bool> {
    let config = global.config_input().resolve(CommandKind::GetBlueprints)?;
    let client = connect(&config)?;

    let entries = blueprint_inventory(&client, &config.old_installation_id, args.include_empty)
        .await
        .context("failed to list blueprints")?;

    if entries.is_empty() {
        println!(
            "No blueprints with entities found for installation {}.",
            config.old_installation_id
        );
    } else {
        print!("{}", render_inventory(&entries));
    }
    Ok(true)
}
