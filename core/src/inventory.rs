//! Listing of the blueprints a legacy installation ingested into.

use std::fmt::Write as _;

use port_migrator_client::{ApiError, CatalogApi, FetchError, OwnershipFilter};
use tracing::warn;

use crate::error::MigrateError;

const NAME_WIDTH: usize = 33;

/// One row of the inventory. `count` is `None` when the entities could not
/// be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintInventoryEntry {
    pub blueprint: String,
    pub count: Option<usize>,
}

/// Discover every blueprint of `installation_id` and count its legacy-owned
/// entities. Blueprints with zero entities are dropped unless
/// `include_empty` is set; blueprints whose count failed are always kept.
pub async fn blueprint_inventory(
    api: &dyn CatalogApi,
    installation_id: &str,
    include_empty: bool,
) -> Result<Vec<BlueprintInventoryEntry>, MigrateError> {
    let blueprints = api
        .discover_blueprints(installation_id)
        .await
        .map_err(MigrateError::discovery)?;
    let filter = OwnershipFilter::legacy(installation_id);

    let mut entries = Vec::with_capacity(blueprints.len());
    for blueprint in blueprints {
        let count = match api.search_entities(&blueprint, &filter).await {
            Ok(entities) => Some(entities.len()),
            Err(FetchError {
                source: ApiError::Auth(auth),
                ..
            }) => return Err(MigrateError::Authentication(auth)),
            Err(err) => {
                warn!(%blueprint, "could not count entities: {err}");
                None
            }
        };
        if count == Some(0) && !include_empty {
            continue;
        }
        entries.push(BlueprintInventoryEntry { blueprint, count });
    }
    Ok(entries)
}

pub fn render_inventory(entries: &[BlueprintInventoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<NAME_WIDTH$} ENTITIES", "NAME");
    let _ = writeln!(out, "{}", "─".repeat(NAME_WIDTH + 9));
    for entry in entries {
        match entry.count {
            Some(count) => {
                let _ = writeln!(out, "{:<NAME_WIDTH$} {count}", entry.blueprint);
            }
            None => {
                let _ = writeln!(out, "{:<NAME_WIDTH$} ?", entry.blueprint);
            }
        }
    }
    out
}
