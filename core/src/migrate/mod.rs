//! Ownership migration orchestrator.
//!
//! One run walks `Discover → Count → Confirm → Execute → Report`:
//!
//! - **Discover**: the requested blueprint, or every blueprint the legacy
//!   installation ingested into.
//! - **Count**: fetch legacy-owned entities per blueprint. A blueprint whose
//!   fetch fails counts as zero and the failure is recorded.
//! - **Confirm**: show the plan and wait for an exact `yes`.
//! - **Execute**: patch each blueprint's identifiers in batches of
//!   [`BATCH_SIZE`]. A failed batch is recorded and the run moves on,
//!   except when the credentials stop working: the run then stops and the
//!   report carries whatever was already patched.
//!
//! Runs that stop before the confirmation gate for lack of work leave the
//! counters at zero; only count failures are kept in `errors`.
//!
//! Everything runs sequentially on the caller's task so batch failures are
//! attributed deterministically and no two patches are ever in flight.

mod batch;
mod render;
mod stats;

use port_migrator_client::{
    ApiError, AuthError, CatalogApi, FetchError, OwnershipFilter, PatchError, ocean_datasource,
};
use tracing::{error, info, warn};

use crate::confirm::{Confirmer, is_confirmed};
use crate::error::MigrateError;

pub use batch::{BATCH_SIZE, batch_count, split_batches};
pub use render::{confirmation_prompt, render_report};
pub use stats::MigrationStats;

/// Which blueprints a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlueprintScope {
    Single(String),
    All,
}

#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub scope: BlueprintScope,
    pub dry_run: bool,
}

/// Legacy-owned entities found for one blueprint during the count phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintPlan {
    pub blueprint: String,
    pub identifiers: Vec<String>,
    /// The count fetch failed; the blueprint is left untouched.
    pub count_failed: bool,
}

impl BlueprintPlan {
    pub fn count(&self) -> usize {
        self.identifiers.len()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Discovery found no blueprints.
    NoBlueprints,
    /// Blueprints were found but none had legacy-owned entities.
    NoEntities,
    /// The operator did not type `yes`.
    Declined,
    /// Execution finished (or was simulated for a dry run).
    Completed,
    /// Execution stopped because authentication failed. Batches patched
    /// before that stay patched.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub outcome: MigrationOutcome,
    pub dry_run: bool,
    /// Ownership tag the entities were (or would be) moved to.
    pub datasource: String,
    /// Maximum identifiers per patch call.
    pub batch_size: usize,
    pub plan: Vec<BlueprintPlan>,
    pub stats: MigrationStats,
}

impl MigrationReport {
    /// Whether the process should exit successfully: the run was not
    /// aborted and every attempted batch went through.
    pub fn succeeded(&self) -> bool {
        self.outcome != MigrationOutcome::Aborted && !self.stats.has_failures()
    }
}

/// Drives one migration run against a catalog.
pub struct Migrator<'a> {
    api: &'a dyn CatalogApi,
    confirmer: &'a dyn Confirmer,
    old_installation_id: String,
    new_installation_id: String,
    batch_size: usize,
}

impl<'a> Migrator<'a> {
    pub fn new(
        api: &'a dyn CatalogApi,
        confirmer: &'a dyn Confirmer,
        old_installation_id: impl Into<String>,
        new_installation_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            confirmer,
            old_installation_id: old_installation_id.into(),
            new_installation_id: new_installation_id.into(),
            batch_size: BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn run(&self, request: &MigrationRequest) -> Result<MigrationReport, MigrateError> {
        let version = self
            .api
            .integration_version(&self.new_installation_id)
            .await
            .map_err(MigrateError::integration)?;
        let datasource = ocean_datasource(&version, &self.new_installation_id);
        info!(%datasource, "resolved target datasource");

        let mut report = MigrationReport {
            outcome: MigrationOutcome::Completed,
            dry_run: request.dry_run,
            datasource,
            batch_size: self.batch_size,
            plan: Vec::new(),
            stats: MigrationStats::default(),
        };

        let blueprints = self.discover(&request.scope).await?;
        if blueprints.is_empty() {
            warn!(
                installation = %self.old_installation_id,
                "no blueprints found for the legacy installation"
            );
            report.outcome = MigrationOutcome::NoBlueprints;
            return Ok(report);
        }

        let blueprints_total = blueprints.len();
        report.plan = self.count(blueprints, &mut report.stats.errors).await?;
        let entities_total = report.plan.iter().map(BlueprintPlan::count).sum();
        if entities_total == 0 {
            warn!("no entities found to migrate");
            report.outcome = MigrationOutcome::NoEntities;
            return Ok(report);
        }
        report.stats.blueprints_total = blueprints_total;
        report.stats.entities_total = entities_total;

        let prompt = confirmation_prompt(
            &report.plan,
            report.stats.entities_total,
            &report.datasource,
            request.dry_run,
            self.batch_size,
        );
        let answer = self
            .confirmer
            .ask(&prompt)
            .await
            .map_err(MigrateError::Confirmation)?;
        if !is_confirmed(&answer) {
            info!("migration cancelled by operator");
            report.outcome = MigrationOutcome::Declined;
            return Ok(report);
        }

        if let Err(err) = self
            .execute(&report.plan, &report.datasource, request.dry_run, &mut report.stats)
            .await
        {
            error!("authentication failed, stopping the migration: {err}");
            report.outcome = MigrationOutcome::Aborted;
        }
        Ok(report)
    }

    async fn discover(&self, scope: &BlueprintScope) -> Result<Vec<String>, MigrateError> {
        match scope {
            BlueprintScope::Single(blueprint) => Ok(vec![blueprint.clone()]),
            BlueprintScope::All => self
                .api
                .discover_blueprints(&self.old_installation_id)
                .await
                .map_err(MigrateError::discovery),
        }
    }

    async fn count(
        &self,
        blueprints: Vec<String>,
        errors: &mut Vec<String>,
    ) -> Result<Vec<BlueprintPlan>, MigrateError> {
        let filter = OwnershipFilter::legacy(&self.old_installation_id);
        let mut plan = Vec::with_capacity(blueprints.len());

        for blueprint in blueprints {
            match self.api.search_entities(&blueprint, &filter).await {
                Ok(entities) => {
                    info!(%blueprint, count = entities.len(), "counted legacy entities");
                    plan.push(BlueprintPlan {
                        blueprint,
                        identifiers: entities.into_iter().map(|e| e.identifier).collect(),
                        count_failed: false,
                    });
                }
                Err(FetchError {
                    source: ApiError::Auth(auth),
                    ..
                }) => return Err(MigrateError::Authentication(auth)),
                Err(err) => {
                    warn!(%blueprint, "could not count entities: {err}");
                    errors.push(format!("could not count entities of blueprint {blueprint}: {err}"));
                    plan.push(BlueprintPlan {
                        blueprint,
                        identifiers: Vec::new(),
                        count_failed: true,
                    });
                }
            }
        }

        Ok(plan)
    }

    async fn execute(
        &self,
        plan: &[BlueprintPlan],
        datasource: &str,
        dry_run: bool,
        stats: &mut MigrationStats,
    ) -> Result<(), AuthError> {
        for entry in plan.iter().filter(|entry| !entry.identifiers.is_empty()) {
            let batches = split_batches(&entry.identifiers, self.batch_size);
            let total = batches.len();

            if dry_run {
                info!(
                    blueprint = %entry.blueprint,
                    entities = entry.count(),
                    batches = total,
                    "dry run: would migrate"
                );
                continue;
            }

            stats.blueprints_processed += 1;
            info!(
                blueprint = %entry.blueprint,
                entities = entry.count(),
                batches = total,
                "migrating blueprint"
            );

            for (index, batch) in batches.into_iter().enumerate() {
                let position = index + 1;
                match self
                    .api
                    .patch_datasource(&entry.blueprint, batch, datasource)
                    .await
                {
                    Ok(()) => {
                        stats.record_success(batch.len());
                        info!(
                            blueprint = %entry.blueprint,
                            "batch {position}/{total}: patched {} entities",
                            batch.len()
                        );
                    }
                    Err(PatchError {
                        source: ApiError::Auth(auth),
                        ..
                    }) => {
                        stats.record_failure(format!(
                            "blueprint {}: batch {position}/{total} ({} entities) not patched, \
                             run stopped: {auth}",
                            entry.blueprint,
                            batch.len()
                        ));
                        return Err(auth);
                    }
                    Err(err) => {
                        error!(blueprint = %entry.blueprint, "batch {position}/{total} failed: {err}");
                        stats.record_failure(format!(
                            "blueprint {}: batch {position}/{total} ({} entities) failed: {err}",
                            entry.blueprint,
                            batch.len()
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
