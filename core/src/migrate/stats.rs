use serde::Serialize;

/// Running counters for one migration run. Owned by the orchestrator and
/// mutated only from its single task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStats {
    /// Blueprints selected for the run.
    pub blueprints_total: usize,
    /// Blueprints that had entities to migrate.
    pub blueprints_processed: usize,
    /// Legacy-owned entities counted across all blueprints.
    pub entities_total: usize,
    /// Entities covered by successful patch calls.
    pub entities_migrated: usize,
    pub batches_attempted: usize,
    pub batches_succeeded: usize,
    pub batches_failed: usize,
    /// Human-readable failures, in the order they happened.
    pub errors: Vec<String>,
}

impl MigrationStats {
    pub(crate) fn record_success(&mut self, entities: usize) {
        self.batches_attempted += 1;
        self.batches_succeeded += 1;
        self.entities_migrated += entities;
    }

    pub(crate) fn record_failure(&mut self, error: String) {
        self.batches_attempted += 1;
        self.batches_failed += 1;
        self.errors.push(error);
    }

    pub fn has_failures(&self) -> bool {
        self.batches_failed > 0
    }
}
