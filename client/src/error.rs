//! Error types for Port API calls.

use thiserror::Error;

/// Failure to obtain a bearer credential from `/v1/auth/access_token`.
///
/// Always fatal to the operation that asked for a token; the token manager
/// never retries on its own.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The exchange request never produced a response.
    #[error("authentication request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The auth endpoint answered with a non-success status.
    #[error("authentication failed (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The auth endpoint answered 2xx but the payload was unusable.
    #[error("failed to decode auth response: {0}")]
    Malformed(String),
}

/// Errors from a single Port API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not obtain a bearer token for the call.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport-level failure (connect, timeout, body read).
    #[error("{call} request failed: {source}")]
    Network {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{call} failed (HTTP {status}): {body}")]
    Status {
        call: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode {call} response: {message}")]
    Decode { call: &'static str, message: String },

    #[error("integration {0} not found")]
    IntegrationNotFound(String),

    #[error("integration {0} reported no version")]
    MissingVersion(String),

    #[error("invalid Port API base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether a read call that failed this way is worth repeating.
    ///
    /// Transport failures, rate limiting and server-side errors are
    /// transient. Authentication, client errors and malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Auth(_)
            | Self::Decode { .. }
            | Self::IntegrationNotFound(_)
            | Self::MissingVersion(_)
            | Self::InvalidBaseUrl(_) => false,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// A paginated search gave up. Pages fetched before the failure are discarded.
#[derive(Debug, Error)]
#[error("failed to fetch entities of blueprint {blueprint} (page {page}): {source}")]
pub struct FetchError {
    pub blueprint: String,
    /// 1-based index of the page that failed.
    pub page: usize,
    #[source]
    pub source: ApiError,
}

impl FetchError {
    pub fn is_auth(&self) -> bool {
        self.source.is_auth()
    }
}

/// A single bulk ownership patch was rejected. Never retried.
#[derive(Debug, Error)]
#[error("failed to patch {count} entities of blueprint {blueprint}: {source}")]
pub struct PatchError {
    pub blueprint: String,
    pub count: usize,
    #[source]
    pub source: ApiError,
}

impl PatchError {
    pub fn is_auth(&self) -> bool {
        self.source.is_auth()
    }
}
