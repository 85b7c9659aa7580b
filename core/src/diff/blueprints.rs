use port_migrator_client::{CatalogApi, OwnershipFilter};
use tracing::info;

use super::{DiffResult, compare};
use crate::error::{DiffError, Side};

/// Which blueprints and installations to compare.
#[derive(Debug, Clone)]
pub struct DiffRequest<'a> {
    pub source_blueprint: &'a str,
    pub target_blueprint: &'a str,
    pub old_installation_id: &'a str,
    pub new_installation_id: &'a str,
}

/// What was fetched for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSnapshot {
    pub blueprint: String,
    /// Label of the ownership filter that selected the entities.
    pub datasource: String,
    pub count: usize,
}

/// A comparison together with the context needed to report it.
#[derive(Debug, Clone)]
pub struct BlueprintDiff {
    pub source: SideSnapshot,
    pub target: SideSnapshot,
    pub result: DiffResult,
}

/// Fetch legacy-owned entities of the source blueprint and Ocean-owned
/// entities of the target blueprint, then compare them.
pub async fn compare_blueprints(
    api: &dyn CatalogApi,
    request: &DiffRequest<'_>,
) -> Result<BlueprintDiff, DiffError> {
    let source_filter = OwnershipFilter::legacy(request.old_installation_id);
    let target_filter = OwnershipFilter::ocean(request.new_installation_id);

    let source = api
        .search_entities(request.source_blueprint, &source_filter)
        .await
        .map_err(|source| DiffError::Fetch {
            side: Side::Source,
            source,
        })?;
    info!(
        blueprint = request.source_blueprint,
        count = source.len(),
        "fetched source entities"
    );

    let target = api
        .search_entities(request.target_blueprint, &target_filter)
        .await
        .map_err(|source| DiffError::Fetch {
            side: Side::Target,
            source,
        })?;
    info!(
        blueprint = request.target_blueprint,
        count = target.len(),
        "fetched target entities"
    );

    Ok(BlueprintDiff {
        source: SideSnapshot {
            blueprint: request.source_blueprint.to_string(),
            datasource: source_filter.label(),
            count: source.len(),
        },
        target: SideSnapshot {
            blueprint: request.target_blueprint.to_string(),
            datasource: target_filter.label(),
            count: target.len(),
        },
        result: compare(&source, &target),
    })
}
