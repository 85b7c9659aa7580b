//! Ownership filters over the `$datasource` field.
//!
//! The datasource string is owned by Port and treated as opaque text: an
//! entity belongs to an installation when the field contains both the
//! integration family tag and an installation-specific needle.

use crate::models::{Query, Rule};

/// Datasource prefix written by the legacy GitHub App integration.
pub const LEGACY_FAMILY: &str = "port/github/v1.0.0";

/// Datasource prefix written by the GitHub Ocean integration.
pub const OCEAN_FAMILY: &str = "port-ocean/github-ocean";

const DATASOURCE_PROPERTY: &str = "$datasource";

/// A pair of substring rules on `$datasource`, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipFilter {
    family: String,
    needle: String,
}

impl OwnershipFilter {
    /// Entities still owned by the legacy installation.
    pub fn legacy(installation_id: &str) -> Self {
        Self {
            family: LEGACY_FAMILY.to_string(),
            needle: installation_id.to_string(),
        }
    }

    /// Entities already owned by the Ocean installation's exporter.
    pub fn ocean(installation_id: &str) -> Self {
        Self {
            family: OCEAN_FAMILY.to_string(),
            needle: format!("{installation_id}/exporter"),
        }
    }

    pub fn query(&self) -> Query {
        Query::all_of(vec![
            Rule::contains(DATASOURCE_PROPERTY, self.family.as_str()),
            Rule::contains(DATASOURCE_PROPERTY, self.needle.as_str()),
        ])
    }

    /// Same containment test the server applies, for local checks.
    pub fn matches(&self, datasource: &str) -> bool {
        datasource.contains(&self.family) && datasource.contains(&self.needle)
    }

    /// Human-readable form used in reports, e.g. `port/github/v1.0.0/*/123`.
    pub fn label(&self) -> String {
        format!("{}/*/{}", self.family, self.needle)
    }
}

/// Compose the ownership tag the Ocean exporter writes.
pub fn ocean_datasource(version: &str, installation_id: &str) -> String {
    format!("{OCEAN_FAMILY}/{version}/{installation_id}/exporter")
}
