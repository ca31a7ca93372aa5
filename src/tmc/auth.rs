//! TMC Authentication
//!
//! TMC accepts short-lived access tokens issued by VMware Cloud Services.
//! A long-lived API token is exchanged for one at the CSP authorize endpoint
//! and the result is cached until shortly before it expires. A pre-issued
//! access token can be used directly instead.

use super::error::{Result, TmcError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

/// Default CSP console used for token exchange
pub const DEFAULT_CSP_URL: &str = "https://console.cloud.vmware.com";

/// Path of the API-token exchange endpoint
const AUTHORIZE_PATH: &str = "csp/gateway/am/api/auth/api-tokens/authorize";

/// Refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// TTL assumed when the exchange response carries no `expires_in`
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
enum TokenSource {
    /// Pre-issued access token, used as-is
    Static(String),
    /// API token exchanged at the CSP endpoint
    Exchange {
        api_token: String,
        authorize_url: Url,
        http: reqwest::Client,
    },
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

/// How long a token with `ttl` may be served from the cache
///
/// The refresh buffer never exceeds half the lifetime, so short-lived tokens
/// are still reused.
fn cache_lifetime(ttl: Duration) -> Duration {
    ttl.saturating_sub(TOKEN_EXPIRY_BUFFER.min(ttl / 2))
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Credentials holder with token caching
#[derive(Clone)]
pub struct TmcCredentials {
    source: TokenSource,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl TmcCredentials {
    /// Use an already issued access token
    pub fn access_token(token: &str) -> Self {
        Self {
            source: TokenSource::Static(token.to_string()),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Exchange `api_token` at `csp_url` on first use
    pub fn api_token(api_token: &str, csp_url: &str, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(csp_url)
            .map_err(|e| TmcError::validation(format!("invalid CSP URL '{}': {}", csp_url, e)))?;
        let authorize_url = base
            .join(AUTHORIZE_PATH)
            .map_err(|e| TmcError::validation(format!("invalid CSP URL '{}': {}", csp_url, e)))?;

        Ok(Self {
            source: TokenSource::Exchange {
                api_token: api_token.to_string(),
                authorize_url,
                http,
            },
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String> {
        let (api_token, authorize_url, http) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Exchange {
                api_token,
                authorize_url,
                http,
            } => (api_token, authorize_url, http),
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached access token expired, exchanging API token again");
            }
        }

        let (token, ttl) = exchange(http, authorize_url, api_token).await?;
        let lifetime = cache_lifetime(ttl);
        let expires_at = Instant::now() + lifetime;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New access token cached, expires in ~{} seconds",
            lifetime.as_secs()
        );

        Ok(token)
    }

    /// Forget the cached access token so the next call exchanges again
    pub async fn invalidate(&self) {
        let mut cache = self.token_cache.write().await;
        *cache = None;
    }
}

async fn exchange(
    http: &reqwest::Client,
    authorize_url: &Url,
    api_token: &str,
) -> Result<(String, Duration)> {
    tracing::debug!("POST {}", authorize_url);

    let response = http
        .post(authorize_url.clone())
        .form(&[("refresh_token", api_token)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("API token exchange rejected: {}", status);
        return Err(TmcError::Auth {
            message: format!("CSP returned {}", status),
        });
    }

    let body: AuthorizeResponse = response.json().await.map_err(|e| TmcError::Auth {
        message: format!("malformed authorize response: {}", e),
    })?;

    let ttl = body
        .expires_in
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TOKEN_TTL);

    Ok((body.access_token, ttl))
}
