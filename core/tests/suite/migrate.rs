use port_migrator_core::{
    BlueprintScope, MigrateError, MigrationOutcome, MigrationRequest, MigrationStats, Migrator,
    ScriptedConfirmer,
};
use pretty_assertions::assert_eq;

use super::{FakeCatalog, NEW_ID, OLD_ID, legacy_entities, ocean_tag};

fn all(dry_run: bool) -> MigrationRequest {
    MigrationRequest {
        scope: BlueprintScope::All,
        dry_run,
    }
}

fn single(blueprint: &str) -> MigrationRequest {
    MigrationRequest {
        scope: BlueprintScope::Single(blueprint.to_string()),
        dry_run: false,
    }
}

#[tokio::test]
async fn failed_batch_does_not_stop_the_rest() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 250))
        .failing_patch(2);
    let confirmer = ScriptedConfirmer::new(["yes\n"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Completed);
    assert_eq!(report.stats.batches_attempted, 3);
    assert_eq!(report.stats.batches_succeeded, 2);
    assert_eq!(report.stats.batches_failed, 1);
    assert_eq!(report.stats.entities_total, 250);
    assert_eq!(report.stats.entities_migrated, 150);
    assert_eq!(report.stats.errors.len(), 1);
    assert!(report.stats.errors[0].contains("service"));
    assert!(report.stats.errors[0].contains("batch 2/3"));
    assert!(!report.succeeded());

    let patches = catalog.patches();
    let sizes: Vec<usize> = patches.iter().map(|p| p.identifiers.len()).collect();
    assert_eq!(sizes, vec![100, 50]);
    assert_eq!(patches[1].identifiers[0], "service-0200");
    assert!(patches.iter().all(|p| p.datasource == ocean_tag()));
}

#[tokio::test]
async fn batches_cover_every_identifier_in_order() {
    let catalog = FakeCatalog::new().with_blueprint("service", legacy_entities("service", 250));
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert!(report.succeeded());
    let sent: Vec<String> = catalog
        .patches()
        .into_iter()
        .flat_map(|p| p.identifiers)
        .collect();
    let expected: Vec<String> = legacy_entities("service", 250)
        .into_iter()
        .map(|e| e.identifier)
        .collect();
    assert_eq!(sent, expected);
    assert_eq!(report.stats.batches_succeeded, 3);
}

#[tokio::test]
async fn blueprints_are_migrated_in_discovery_order() {
    let catalog = FakeCatalog::new()
        .with_blueprint("team", legacy_entities("team", 2))
        .with_blueprint("repository", legacy_entities("repository", 3))
        .with_blueprint("empty", Vec::new());
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .with_batch_size(2)
        .run(&all(false))
        .await
        .unwrap();

    let order: Vec<(String, usize)> = catalog
        .patches()
        .into_iter()
        .map(|p| (p.blueprint, p.identifiers.len()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("repository".to_string(), 2),
            ("repository".to_string(), 1),
            ("team".to_string(), 2),
        ]
    );
    assert_eq!(report.stats.blueprints_total, 3);
    assert_eq!(report.stats.blueprints_processed, 2);
}

#[tokio::test]
async fn anything_but_exact_yes_declines() {
    for answer in ["y", "YES", "", "yes please", " yes"] {
        let catalog = FakeCatalog::new().with_blueprint("service", legacy_entities("service", 5));
        let confirmer = ScriptedConfirmer::new([answer]);

        let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
            .run(&all(false))
            .await
            .unwrap();

        assert_eq!(report.outcome, MigrationOutcome::Declined, "{answer:?}");
        assert!(report.succeeded());
        assert_eq!(catalog.patch_attempts(), 0, "{answer:?}");
        assert_eq!(report.stats.batches_attempted, 0);
    }
}

#[tokio::test]
async fn prompt_shows_counts_and_target_datasource() {
    let catalog = FakeCatalog::new().with_blueprint("service", legacy_entities("service", 5));
    let confirmer = ScriptedConfirmer::new(["no"]);

    Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    let prompts = confirmer.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Total entities affected: 5"));
    assert!(prompts[0].contains(&ocean_tag()));
    assert!(prompts[0].ends_with("Type 'yes' to proceed: "));
}

#[tokio::test]
async fn dry_run_confirms_but_never_patches() {
    let catalog = FakeCatalog::new().with_blueprint("service", legacy_entities("service", 250));
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(true))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Completed);
    assert!(report.dry_run);
    assert_eq!(catalog.patch_attempts(), 0);
    assert_eq!(report.stats.entities_total, 250);
    assert_eq!(report.stats.batches_attempted, 0);
    assert_eq!(report.stats.blueprints_processed, 0);
    assert!(confirmer.prompts()[0].contains("DRY RUN"));
    assert!(report.succeeded());
}

#[tokio::test]
async fn no_entities_ends_with_a_warning() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", Vec::new())
        .with_blueprint("team", Vec::new());
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::NoEntities);
    assert_eq!(report.stats, MigrationStats::default());
    assert!(report.succeeded());
    assert!(confirmer.prompts().is_empty());
    assert_eq!(catalog.patch_attempts(), 0);
}

#[tokio::test]
async fn no_blueprints_ends_with_a_warning() {
    let catalog = FakeCatalog::new();
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::NoBlueprints);
    assert_eq!(report.stats, MigrationStats::default());
    assert!(report.succeeded());
    assert!(confirmer.prompts().is_empty());
}

#[tokio::test]
async fn single_blueprint_skips_discovery() {
    let catalog = FakeCatalog::new()
        .with_entities("service", legacy_entities("service", 3))
        .with_blueprint("team", legacy_entities("team", 4));
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&single("service"))
        .await
        .unwrap();

    assert_eq!(report.stats.blueprints_total, 1);
    assert_eq!(report.stats.entities_migrated, 3);
    assert!(catalog.patches().iter().all(|p| p.blueprint == "service"));
}

#[tokio::test]
async fn count_failure_is_recorded_and_the_rest_proceeds() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 3))
        .with_blueprint("team", legacy_entities("team", 2))
        .failing_search("team");
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Completed);
    assert_eq!(report.stats.entities_total, 3);
    assert_eq!(report.stats.entities_migrated, 3);
    assert_eq!(report.stats.errors.len(), 1);
    assert!(report.stats.errors[0].contains("team"));
    assert!(report.plan.iter().any(|p| p.blueprint == "team" && p.count_failed));
    // Count failures are not batch failures.
    assert!(report.succeeded());
    assert!(catalog.patches().iter().all(|p| p.blueprint == "service"));
}

#[tokio::test]
async fn rejected_credentials_abort_the_run() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 3))
        .rejecting_credentials();
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let err = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::Authentication(_)), "{err:?}");
    assert!(confirmer.prompts().is_empty());
    assert_eq!(catalog.patch_attempts(), 0);
}

#[tokio::test]
async fn unknown_target_installation_is_fatal() {
    let catalog = FakeCatalog::new().with_blueprint("service", legacy_entities("service", 3));
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let err = Migrator::new(&catalog, &confirmer, OLD_ID, "missing")
        .run(&all(false))
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::IntegrationVersion(_)), "{err:?}");
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn count_failures_survive_an_empty_run() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", Vec::new())
        .with_blueprint("team", legacy_entities("team", 2))
        .failing_search("team");
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::NoEntities);
    assert_eq!(report.stats.blueprints_total, 0);
    assert_eq!(report.stats.entities_total, 0);
    assert_eq!(report.stats.errors.len(), 1);
    assert!(report.stats.errors[0].contains("team"));
    assert!(report.succeeded());
}

#[tokio::test]
async fn rejected_search_aborts_before_confirmation() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 3))
        .rejecting_searches();
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let err = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::Authentication(_)), "{err:?}");
    assert!(confirmer.prompts().is_empty());
    assert_eq!(catalog.patch_attempts(), 0);
}

#[tokio::test]
async fn rejected_patch_stops_the_run_and_keeps_partial_stats() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 250))
        .with_blueprint("team", legacy_entities("team", 5))
        .rejecting_patches_from(3);
    let confirmer = ScriptedConfirmer::new(["yes"]);

    let report = Migrator::new(&catalog, &confirmer, OLD_ID, NEW_ID)
        .run(&all(false))
        .await
        .unwrap();

    assert_eq!(report.outcome, MigrationOutcome::Aborted);
    assert!(!report.succeeded());
    // Nothing is attempted after the credentials were rejected.
    assert_eq!(catalog.patch_attempts(), 3);
    assert_eq!(report.stats.batches_attempted, 3);
    assert_eq!(report.stats.batches_succeeded, 2);
    assert_eq!(report.stats.batches_failed, 1);
    assert_eq!(report.stats.entities_migrated, 200);
    assert_eq!(report.stats.entities_total, 255);
    assert_eq!(report.stats.errors.len(), 1);
    assert!(report.stats.errors[0].contains("batch 3/3"), "{:?}", report.stats.errors);
    assert!(report.stats.errors[0].contains("authentication failed"));
    assert!(catalog.patches().iter().all(|p| p.blueprint == "service"));
}
