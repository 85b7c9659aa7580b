use anyhow::Context;
use chrono::Utc;
use port_migrator_core::diff::{DiffReport, render_changes, render_summary, write_report};
use port_migrator_core::{CommandKind, DiffRequest, compare_blueprints};
use tracing::info;

use crate::{GetDiffArgs, GlobalArgs, connect};

pub(crate) async fn run(global: &GlobalArgs, args: &GetDiffArgs) -> anyhow::Result<bool> {
    let config = global.config_input().resolve(CommandKind::GetDiff)?;
    let new_installation_id = config.new_installation_id()?;
    let client = connect(&config)?;

    let request = DiffRequest {
        source_blueprint: &args.source_blueprint,
        target_blueprint: &args.target_blueprint,
        old_installation_id: &config.old_installation_id,
        new_installation_id,
    };
    let diff = compare_blueprints(&client, &request)
        .await
        .context("comparison failed")?;

    println!();
    print!("{}", render_summary(&diff));

    if args.show_diffs {
        let changes = render_changes(&diff.result, args.limit);
        if !changes.is_empty() {
            println!();
            print!("{changes}");
        }
    }

    if let Some(path) = &args.output {
        write_report(path, &DiffReport::new(&diff, Utc::now()))?;
        info!(path = %path.display(), "wrote diff report");
        println!("\n💾 Report saved to {}", path.display());
    }
    Ok(true)
}
