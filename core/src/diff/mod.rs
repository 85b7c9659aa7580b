//! Structural diff between the legacy-owned and Ocean-owned entity sets.
//!
//! Entities are matched by identifier. Matches are split into identical and
//! changed; the rest are either not migrated (source only) or orphaned
//! (target only). Every list in a [`DiffResult`] is sorted by identifier so
//! reports are stable across runs.

mod blueprints;
mod fields;
mod render;
mod report;

use std::collections::BTreeMap;

use port_migrator_client::Entity;
use serde::Serialize;

pub use blueprints::{BlueprintDiff, DiffRequest, SideSnapshot, compare_blueprints};
pub use fields::{EXCLUDED_FIELDS, FieldChange, entity_changes, map_changes};
pub use render::{render_changes, render_summary};
pub use report::{DiffReport, write_report};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub identical: usize,
    pub not_migrated: usize,
    pub changed: usize,
    pub orphaned: usize,
}

/// Outcome of comparing two entity collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub summary: DiffSummary,
    /// Source identifiers with no counterpart in the target.
    pub not_migrated: Vec<String>,
    /// Leaf differences per changed identifier.
    pub changed: BTreeMap<String, Vec<FieldChange>>,
    /// Target identifiers with no counterpart in the source.
    pub orphaned: Vec<String>,
}

/// Compare `source` (old owner) against `target` (new owner).
pub fn compare(source: &[Entity], target: &[Entity]) -> DiffResult {
    let source_index: BTreeMap<&str, &Entity> = source
        .iter()
        .map(|e| (e.identifier.as_str(), e))
        .collect();
    let target_index: BTreeMap<&str, &Entity> = target
        .iter()
        .map(|e| (e.identifier.as_str(), e))
        .collect();

    let mut result = DiffResult::default();

    for (identifier, old) in &source_index {
        match target_index.get(identifier) {
            Some(new) => {
                let changes = entity_changes(old, new);
                if changes.is_empty() {
                    result.summary.identical += 1;
                } else {
                    result.changed.insert((*identifier).to_string(), changes);
                }
            }
            None => result.not_migrated.push((*identifier).to_string()),
        }
    }

    result.orphaned = target_index
        .keys()
        .filter(|identifier| !source_index.contains_key(*identifier))
        .map(|identifier| (*identifier).to_string())
        .collect();

    result.summary.changed = result.changed.len();
    result.summary.not_migrated = result.not_migrated.len();
    result.summary.orphaned = result.orphaned.len();
    result
}
