//! The catalog operations the migration and diff flows depend on.

use async_trait::async_trait;

use crate::error::{ApiError, FetchError, PatchError};
use crate::filter::OwnershipFilter;
use crate::models::Entity;

/// Catalog calls consumed by the orchestrator and the diff command.
///
/// [`crate::PortClient`] is the production implementation; tests swap in
/// in-memory catalogs.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Version string of the integration behind `installation_id`.
    async fn integration_version(&self, installation_id: &str) -> Result<String, ApiError>;

    /// Blueprints that `installation_id` has ingested into, sorted.
    async fn discover_blueprints(&self, installation_id: &str) -> Result<Vec<String>, ApiError>;

    /// Every entity of `blueprint` matching `filter`, in server order.
    async fn search_entities(
        &self,
        blueprint: &str,
        filter: &OwnershipFilter,
    ) -> Result<Vec<Entity>, FetchError>;

    /// Reassign ownership of `identifiers` in one call.
    async fn patch_datasource(
        &self,
        blueprint: &str,
        identifiers: &[String],
        datasource: &str,
    ) -> Result<(), PatchError>;
}
