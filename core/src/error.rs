//! Error taxonomy for the migration and diff flows.
//!
//! Per-batch and per-blueprint failures never surface here: they are caught
//! by the orchestrator and recorded in
//! [`MigrationStats::errors`](crate::MigrationStats::errors). What remains
//! is fatal to the whole command.

use std::path::PathBuf;

use port_migrator_client::{ApiError, AuthError, FetchError};
use thiserror::Error;

/// Missing or invalid settings, detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required options: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid Port API URL {0:?}: expected an http:// or https:// URL")]
    InvalidUrl(String),
}

/// Run-fatal failures of `migrate` and `get-blueprints`.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Authentication(AuthError),

    #[error("failed to get integration version: {0}")]
    IntegrationVersion(#[source] ApiError),

    #[error("failed to get blueprints: {0}")]
    Discovery(#[source] ApiError),

    #[error("failed to read confirmation: {0}")]
    Confirmation(#[source] std::io::Error),
}

impl MigrateError {
    pub(crate) fn integration(err: ApiError) -> Self {
        match err {
            ApiError::Auth(auth) => Self::Authentication(auth),
            other => Self::IntegrationVersion(other),
        }
    }

    pub(crate) fn discovery(err: ApiError) -> Self {
        match err {
            ApiError::Auth(auth) => Self::Authentication(auth),
            other => Self::Discovery(other),
        }
    }
}

/// Which side of a comparison a fetch belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Failures of `get-diff`.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to get {side} entities: {source}")]
    Fetch {
        side: Side,
        #[source]
        source: FetchError,
    },

    #[error("failed to serialize diff report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write diff report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
