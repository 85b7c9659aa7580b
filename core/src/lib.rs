//! Ownership migration of Port catalog entities from the legacy GitHub app
//! to the Ocean GitHub integration, plus the pre/post-migration comparison.

pub mod config;
pub mod confirm;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod migrate;

pub use config::{CommandKind, ConfigInput, MigratorConfig};
pub use confirm::{CONFIRMATION_WORD, Confirmer, ScriptedConfirmer, StdinConfirmer, is_confirmed};
pub use diff::{BlueprintDiff, DiffReport, DiffRequest, DiffResult, DiffSummary, compare, compare_blueprints};
pub use error::{ConfigError, DiffError, MigrateError, Side};
pub use inventory::{BlueprintInventoryEntry, blueprint_inventory, render_inventory};
pub use migrate::{
    BATCH_SIZE, BlueprintPlan, BlueprintScope, MigrationOutcome, MigrationReport,
    MigrationRequest, MigrationStats, Migrator,
};
