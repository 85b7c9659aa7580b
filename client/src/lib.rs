//! Port REST API client used by the ownership migration tool.
//!
//! Covers the handful of calls the migration needs:
//! - client-credential token exchange with proactive renewal
//! - integration version lookup and datasource-based blueprint discovery
//! - paginated, ownership-filtered entity search
//! - bulk datasource reassignment

mod api;
mod auth;
mod client;
mod error;
mod filter;
mod models;
mod retry;

pub use api::CatalogApi;
pub use auth::{CachedToken, ClientCredentials, Clock, REFRESH_MARGIN_SECS, SystemClock, TokenManager};
pub use client::{DEFAULT_BASE_URL, PortClient, SEARCH_PAGE_SIZE, create_client};
pub use error::{ApiError, AuthError, FetchError, PatchError};
pub use filter::{LEGACY_FAMILY, OCEAN_FAMILY, OwnershipFilter, ocean_datasource};
pub use models::{Entity, Query, Rule};
pub use retry::RetryPolicy;
