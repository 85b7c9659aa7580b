//! Wire types for the Port REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog record as returned by entity search.
///
/// Identity is `(blueprint, identifier)`. Property values are arbitrary JSON
/// and may nest to any depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub blueprint: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Top-level fields this tool does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity {
    /// Ownership tag, when the service includes it in the payload.
    pub fn datasource(&self) -> Option<&str> {
        ["datasource", "$datasource"]
            .iter()
            .find_map(|key| self.extra.get(*key))
            .and_then(Value::as_str)
    }
}

/// One predicate of a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub property: String,
    pub operator: String,
    pub value: String,
}

impl Rule {
    /// `property contains value`.
    pub fn contains(property: &str, value: impl Into<String>) -> Self {
        Self {
            property: property.to_string(),
            operator: "contains".to_string(),
            value: value.into(),
        }
    }
}

/// Rules combined with a logical operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub combinator: String,
    pub rules: Vec<Rule>,
}

impl Query {
    pub fn all_of(rules: Vec<Rule>) -> Self {
        Self {
            combinator: "and".to_string(),
            rules,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<&'a str>,
    pub query: &'a Query,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataSourcesResponse {
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataSource {
    #[serde(default)]
    pub blueprints: Vec<BlueprintRef>,
    #[serde(default)]
    pub context: DataSourceContext,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlueprintRef {
    pub identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DataSourceContext {
    #[serde(default)]
    pub installation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IntegrationResponse {
    pub integration: IntegrationDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IntegrationDetails {
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkPatchRequest<'a> {
    pub entities_identifiers: &'a [String],
    pub datasource: &'a str,
}
