//! JSON export of a blueprint comparison.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{BlueprintDiff, DiffSummary, FieldChange};
use crate::error::DiffError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSide<'a> {
    pub blueprint: &'a str,
    pub datasource: &'a str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetails<'a> {
    pub not_migrated: &'a [String],
    pub changed: &'a BTreeMap<String, Vec<FieldChange>>,
    pub orphaned: &'a [String],
}

/// Persisted form of a [`BlueprintDiff`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport<'a> {
    pub blueprint: &'a str,
    pub timestamp: String,
    pub source: ReportSide<'a>,
    pub target: ReportSide<'a>,
    pub summary: DiffSummary,
    pub details: ReportDetails<'a>,
}

impl<'a> DiffReport<'a> {
    pub fn new(diff: &'a BlueprintDiff, generated_at: DateTime<Utc>) -> Self {
        Self {
            blueprint: &diff.source.blueprint,
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source: ReportSide {
                blueprint: &diff.source.blueprint,
                datasource: &diff.source.datasource,
                count: diff.source.count,
            },
            target: ReportSide {
                blueprint: &diff.target.blueprint,
                datasource: &diff.target.datasource,
                count: diff.target.count,
            },
            summary: diff.result.summary,
            details: ReportDetails {
                not_migrated: &diff.result.not_migrated,
                changed: &diff.result.changed,
                orphaned: &diff.result.orphaned,
            },
        }
    }
}

/// Write `report` as pretty-printed JSON, replacing any existing file.
pub fn write_report(path: &Path, report: &DiffReport<'_>) -> Result<(), DiffError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    std::fs::write(path, json).map_err(|source| DiffError::WriteReport {
        path: path.to_path_buf(),
        source,
    })
}
