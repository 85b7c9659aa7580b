//! Console rendering of a comparison.

use std::fmt::Write as _;

use serde_json::Value;

use super::{BlueprintDiff, DiffResult};

fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "(absent)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Counts per partition, listing the identifiers of the not-migrated and
/// orphaned ones.
pub fn render_summary(diff: &BlueprintDiff) -> String {
    let summary = &diff.result.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "📊 {} (old) → {} (new)",
        diff.source.blueprint, diff.target.blueprint
    );
    let _ = writeln!(out, "   {}", "─".repeat(40));
    let _ = writeln!(
        out,
        "   {} source entities, {} target entities",
        diff.source.count, diff.target.count
    );
    let _ = writeln!(out, "   ✅ {} identical", summary.identical);
    if summary.not_migrated > 0 {
        let _ = writeln!(out, "   ⚠️  {} not migrated (only in old)", summary.not_migrated);
        for identifier in &diff.result.not_migrated {
            let _ = writeln!(out, "       • {identifier}");
        }
    }
    let _ = writeln!(out, "   📝 {} changed", summary.changed);
    if summary.orphaned > 0 {
        let _ = writeln!(out, "   ❌ {} orphaned (only in new)", summary.orphaned);
        for identifier in &diff.result.orphaned {
            let _ = writeln!(out, "       • {identifier}");
        }
    }
    out
}

/// Leaf differences of at most `limit` changed entities, in identifier order.
/// Empty when nothing changed.
pub fn render_changes(result: &DiffResult, limit: usize) -> String {
    let total = result.changed.len();
    if total == 0 {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "📋 Changed entities (showing up to {limit}):");

    for (index, (identifier, changes)) in result.changed.iter().take(limit).enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "  • {identifier}");
        for change in changes {
            let _ = writeln!(
                out,
                "    - {}: {}",
                change.path,
                display_value(change.old_value.as_ref())
            );
            let _ = writeln!(
                out,
                "    + {}: {}",
                change.path,
                display_value(change.new_value.as_ref())
            );
        }
    }

    if total > limit {
        let _ = writeln!(
            out,
            "\n⏭️  Showing {limit} of {total} changed entities. Use --limit to show more."
        );
    }
    out
}
