//! Bearer credential acquisition and caching.
//!
//! Port issues short-lived access tokens in exchange for a client id and
//! secret. [`TokenManager`] keeps the current token and renews it once the
//! remaining validity drops under [`REFRESH_MARGIN_SECS`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AuthError;

/// Renew the token when it has less than this many seconds left.
pub const REFRESH_MARGIN_SECS: i64 = 3 * 60;

const AUTH_PATH: &str = "/v1/auth/access_token";

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Client id and secret used for the token exchange.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    access_token: String,
    expires_in: i64,
}

/// A token together with the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True once `now` is within the refresh margin of expiry.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Owns the cached credential for one client. Pass it by reference to
/// whatever issues authenticated calls.
pub struct TokenManager {
    http: reqwest::Client,
    auth_url: String,
    credentials: ClientCredentials,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, base_url: &str, credentials: ClientCredentials) -> Self {
        Self {
            http,
            auth_url: format!("{}{AUTH_PATH}", base_url.trim_end_matches('/')),
            credentials,
            clock: Arc::new(SystemClock),
            cached: Mutex::new(None),
        }
    }

    /// Replace the wall clock, mostly for expiry tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return a usable bearer token, exchanging credentials only when the
    /// cache is empty or about to expire.
    pub async fn token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref().filter(|t| !t.needs_refresh(now)) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.exchange(now).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, AuthError> {
        debug!(client_id = %self.credentials.client_id, "requesting Port access token");

        let response = self
            .http
            .post(&self.auth_url)
            .json(&AuthRequest {
                client_id: &self.credentials.client_id,
                client_secret: &self.credentials.client_secret,
            })
            .send()
            .await
            .map_err(AuthError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        if body.access_token.is_empty() {
            return Err(AuthError::Malformed("empty accessToken".to_string()));
        }

        let lifetime = TimeDelta::try_seconds(body.expires_in)
            .filter(|d| *d > TimeDelta::zero())
            .ok_or_else(|| AuthError::Malformed(format!("invalid expiresIn {}", body.expires_in)))?;

        debug!(expires_in = body.expires_in, "obtained Port access token");

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: now + lifetime,
        })
    }
}
