//! HTTP client for the Port REST API.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::CatalogApi;
use crate::auth::{ClientCredentials, Clock, TokenManager};
use crate::error::{ApiError, FetchError, PatchError};
use crate::filter::OwnershipFilter;
use crate::models::{
    BulkPatchRequest, DataSourcesResponse, Entity, IntegrationResponse, Query, SearchRequest,
    SearchResponse,
};
use crate::retry::{RetryPolicy, retry_read};

/// Default Port API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.getport.io";

/// Entities requested per search page.
pub const SEARCH_PAGE_SIZE: usize = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const INTEGRATION_CALL: &str = "integration lookup";
const DATA_SOURCES_CALL: &str = "data source discovery";
const SEARCH_CALL: &str = "entity search";
const PATCH_CALL: &str = "bulk datasource patch";

/// Build the shared HTTP client used for every Port call.
pub fn create_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("port-migrator/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Authenticated Port API client.
///
/// Calls are issued one at a time; pagination follows the server cursor
/// sequentially and read calls are retried according to [`RetryPolicy`].
pub struct PortClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenManager,
    retry: RetryPolicy,
}

impl PortClient {
    pub fn new(base_url: &str, credentials: ClientCredentials) -> Result<Self, reqwest::Error> {
        Ok(Self::with_http(create_client()?, base_url, credentials))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, credentials: ClientCredentials) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let tokens = TokenManager::new(http.clone(), &base_url, credentials);
        Self {
            http,
            base_url,
            tokens,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = || ApiError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.token().await?;
        Ok(builder.bearer_auth(token))
    }

    async fn send(call: &'static str, builder: RequestBuilder) -> Result<Response, ApiError> {
        builder
            .send()
            .await
            .map_err(|source| ApiError::Network { call, source })
    }

    async fn ensure_success(call: &'static str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            call,
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        call: &'static str,
        response: Response,
    ) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            call,
            message: e.to_string(),
        })
    }

    async fn fetch_integration_version(&self, installation_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["v1", "integration", installation_id])?;
        let request = self.authorized(self.http.get(url)).await?;
        let response = Self::send(INTEGRATION_CALL, request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::IntegrationNotFound(installation_id.to_string()));
        }
        let response = Self::ensure_success(INTEGRATION_CALL, response).await?;
        let body: IntegrationResponse = Self::decode(INTEGRATION_CALL, response).await?;

        body.integration
            .version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::MissingVersion(installation_id.to_string()))
    }

    async fn fetch_blueprints(&self, installation_id: &str) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["v1", "data-sources"])?;
        let request = self.authorized(self.http.get(url)).await?;
        let response = Self::send(DATA_SOURCES_CALL, request).await?;
        let response = Self::ensure_success(DATA_SOURCES_CALL, response).await?;
        let body: DataSourcesResponse = Self::decode(DATA_SOURCES_CALL, response).await?;

        let blueprints: BTreeSet<String> = body
            .data_sources
            .into_iter()
            .filter(|ds| ds.context.installation_id.as_deref() == Some(installation_id))
            .flat_map(|ds| ds.blueprints)
            .map(|bp| bp.identifier)
            .collect();

        Ok(blueprints.into_iter().collect())
    }

    async fn search_page(
        &self,
        blueprint: &str,
        query: &Query,
        cursor: Option<&str>,
    ) -> Result<SearchResponse, ApiError> {
        let body = SearchRequest {
            limit: SEARCH_PAGE_SIZE,
            from: cursor,
            query,
        };
        let url = self.endpoint(&["v1", "blueprints", blueprint, "entities", "search"])?;
        let request = self.authorized(self.http.post(url).json(&body)).await?;
        let response = Self::send(SEARCH_CALL, request).await?;
        let response = Self::ensure_success(SEARCH_CALL, response).await?;
        Self::decode(SEARCH_CALL, response).await
    }

    /// Fetch every page of a filtered search, following the `next` cursor
    /// until the server stops returning one.
    pub async fn search(&self, blueprint: &str, query: &Query) -> Result<Vec<Entity>, FetchError> {
        let mut entities = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            let response = retry_read(&self.retry, SEARCH_CALL, || {
                self.search_page(blueprint, query, cursor.as_deref())
            })
            .await
            .map_err(|source| FetchError {
                blueprint: blueprint.to_string(),
                page,
                source,
            })?;

            debug!(
                blueprint,
                page,
                fetched = response.entities.len(),
                "fetched entity page"
            );
            entities.extend(response.entities);

            match response.next.filter(|next| !next.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(entities)
    }

    async fn send_patch(
        &self,
        blueprint: &str,
        identifiers: &[String],
        datasource: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["v1", "blueprints", blueprint, "datasource", "bulk"])?;
        let request = self
            .authorized(self.http.patch(url).json(&BulkPatchRequest {
                entities_identifiers: identifiers,
                datasource,
            }))
            .await?;
        let response = Self::send(PATCH_CALL, request).await?;
        Self::ensure_success(PATCH_CALL, response).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for PortClient {
    async fn integration_version(&self, installation_id: &str) -> Result<String, ApiError> {
        retry_read(&self.retry, INTEGRATION_CALL, || {
            self.fetch_integration_version(installation_id)
        })
        .await
    }

    async fn discover_blueprints(&self, installation_id: &str) -> Result<Vec<String>, ApiError> {
        retry_read(&self.retry, DATA_SOURCES_CALL, || {
            self.fetch_blueprints(installation_id)
        })
        .await
    }

    async fn search_entities(
        &self,
        blueprint: &str,
        filter: &OwnershipFilter,
    ) -> Result<Vec<Entity>, FetchError> {
        self.search(blueprint, &filter.query()).await
    }

    async fn patch_datasource(
        &self,
        blueprint: &str,
        identifiers: &[String],
        datasource: &str,
    ) -> Result<(), PatchError> {
        if identifiers.is_empty() {
            return Ok(());
        }

        self.send_patch(blueprint, identifiers, datasource)
            .await
            .map_err(|source| PatchError {
                blueprint: blueprint.to_string(),
                count: identifiers.len(),
                source,
            })?;

        info!(blueprint, count = identifiers.len(), "patched entity ownership");
        Ok(())
    }
}
