use std::fmt::Write as _;

use super::{BlueprintPlan, MigrationOutcome, MigrationReport, MigrationStats, batch_count};
use crate::confirm::CONFIRMATION_WORD;

/// Text shown before the confirmation gate. Ends with the input prompt and
/// no trailing newline so the operator types on the same line.
pub fn confirmation_prompt(
    plan: &[BlueprintPlan],
    total: usize,
    datasource: &str,
    dry_run: bool,
    batch_size: usize,
) -> String {
    let width = plan
        .iter()
        .map(|entry| entry.blueprint.len())
        .chain(std::iter::once("BLUEPRINT".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "⚠️  WARNING: This action cannot be undone!");
    let _ = writeln!(
        out,
        "    Please verify your data with 'get-diff' and '--dry-run' before proceeding."
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<width$}  ENTITIES", "BLUEPRINT");
    for entry in plan {
        let count = if entry.count_failed {
            "?".to_string()
        } else {
            entry.count().to_string()
        };
        let _ = writeln!(out, "{:<width$}  {count}", entry.blueprint);
    }
    let _ = writeln!(out);
    let batches: usize = plan
        .iter()
        .map(|entry| batch_count(entry.count(), batch_size))
        .sum();
    let _ = writeln!(out, "📊 Total entities affected: {total}");
    let _ = writeln!(
        out,
        "🏷️  New datasource: {datasource} ({batches} batches of up to {batch_size})"
    );
    if dry_run {
        let _ = writeln!(out, "🔄 DRY RUN - no changes will be made");
    }
    let _ = write!(out, "\nType '{CONFIRMATION_WORD}' to proceed: ");
    out
}

/// Final summary of a run, including every recorded error.
pub fn render_report(report: &MigrationReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    match report.outcome {
        MigrationOutcome::NoBlueprints => {
            let _ = writeln!(out, "⚠️  No blueprints found for the old installation. Exiting.");
        }
        MigrationOutcome::NoEntities => {
            let _ = writeln!(out, "⚠️  No entities found to migrate. Exiting.");
        }
        MigrationOutcome::Declined => {
            let _ = writeln!(out, "❌ Migration cancelled.");
        }
        MigrationOutcome::Completed if report.dry_run => {
            let _ = writeln!(out, "🔄 Dry run complete. Nothing was changed.");
            for entry in report.plan.iter().filter(|entry| entry.count() > 0) {
                let _ = writeln!(
                    out,
                    "   {}: would migrate {} entities in {} batches",
                    entry.blueprint,
                    entry.count(),
                    batch_count(entry.count(), report.batch_size)
                );
            }
        }
        MigrationOutcome::Completed if stats.has_failures() => {
            let _ = writeln!(out, "⚠️  Migration finished with failures.");
        }
        MigrationOutcome::Completed => {
            let _ = writeln!(out, "✅ Migration complete!");
        }
        MigrationOutcome::Aborted => {
            let _ = writeln!(
                out,
                "❌ Migration aborted: authentication failed. Batches counted as succeeded below were applied."
            );
        }
    }

    let nothing_to_do = matches!(
        report.outcome,
        MigrationOutcome::NoBlueprints | MigrationOutcome::NoEntities
    );
    if !nothing_to_do {
        write_totals(&mut out, stats);
    }

    if !stats.errors.is_empty() {
        let _ = writeln!(out, "\n❌ Errors:");
        for error in &stats.errors {
            let _ = writeln!(out, "   • {error}");
        }
    }
    out
}

fn write_totals(out: &mut String, stats: &MigrationStats) {
    let _ = writeln!(
        out,
        "   Blueprints: {} processed of {}",
        stats.blueprints_processed, stats.blueprints_total
    );
    let _ = writeln!(
        out,
        "   Entities:   {} migrated of {}",
        stats.entities_migrated, stats.entities_total
    );
    let _ = writeln!(
        out,
        "   Batches:    {} attempted, {} succeeded, {} failed",
        stats.batches_attempted, stats.batches_succeeded, stats.batches_failed
    );
}
