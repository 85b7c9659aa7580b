use port_migrator_core::{BlueprintInventoryEntry, MigrateError, blueprint_inventory};
use pretty_assertions::assert_eq;

use super::{FakeCatalog, OLD_ID, legacy_entities};

fn catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 4))
        .with_blueprint("empty", Vec::new())
        .with_blueprint("team", legacy_entities("team", 1))
        .failing_search("team")
}

#[tokio::test]
async fn hides_empty_blueprints_by_default() {
    let entries = blueprint_inventory(&catalog(), OLD_ID, false).await.unwrap();

    assert_eq!(
        entries,
        vec![
            BlueprintInventoryEntry {
                blueprint: "service".to_string(),
                count: Some(4),
            },
            BlueprintInventoryEntry {
                blueprint: "team".to_string(),
                count: None,
            },
        ]
    );
}

#[tokio::test]
async fn include_empty_keeps_zero_counts() {
    let entries = blueprint_inventory(&catalog(), OLD_ID, true).await.unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.blueprint.as_str()).collect();
    assert_eq!(names, vec!["empty", "service", "team"]);
    assert_eq!(entries[0].count, Some(0));
}

#[tokio::test]
async fn unknown_installation_lists_nothing() {
    let entries = blueprint_inventory(&catalog(), "other", true).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn rejected_credentials_are_fatal() {
    let catalog = FakeCatalog::new()
        .with_blueprint("service", legacy_entities("service", 1))
        .rejecting_credentials();

    let err = blueprint_inventory(&catalog, OLD_ID, false).await.unwrap_err();
    assert!(matches!(err, MigrateError::Authentication(_)), "{err:?}");
}
