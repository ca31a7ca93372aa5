//! Configuration Management
//!
//! Provider settings are resolved from, in order of precedence: command-line
//! flags, environment (`TMC_ORG_URL`, `TMC_API_TOKEN`, `TMC_CSP_URL`, applied
//! by the CLI parser), the JSON config file and built-in defaults.

use crate::tmc::auth::{TmcCredentials, DEFAULT_CSP_URL};
use crate::tmc::client::TmcClient;
use crate::tmc::http::TmcHttpClient;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-request timeout when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Persistent configuration file (`<config_dir>/tmc-provider/config.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csp_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tmc-provider").join("config.json"))
    }

    /// Load configuration from the default location; a missing file is empty
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file is empty
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub org_url: Option<String>,
    pub api_token: Option<String>,
    /// Pre-issued access token, bypasses the API token exchange
    pub access_token: Option<String>,
    pub csp_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// How the provider authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    ApiToken(String),
    AccessToken(String),
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken(_) => write!(f, "ApiToken(..)"),
            Self::AccessToken(_) => write!(f, "AccessToken(..)"),
        }
    }
}

/// Fully resolved provider configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub org_url: String,
    pub auth: AuthMode,
    pub csp_url: String,
    pub request_timeout: Duration,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Merge command-line/environment values over the config file
    pub fn resolve(overrides: Overrides, file: Config) -> Result<Self> {
        let Some(org_url) = non_empty(overrides.org_url).or(non_empty(file.org_url)) else {
            bail!("no TMC organization URL configured (use --org-url or TMC_ORG_URL)");
        };

        let auth = match non_empty(overrides.access_token) {
            Some(token) => AuthMode::AccessToken(token),
            None => match non_empty(overrides.api_token).or(non_empty(file.api_token)) {
                Some(token) => AuthMode::ApiToken(token),
                None => bail!("no TMC API token configured (use --api-token or TMC_API_TOKEN)"),
            },
        };

        let csp_url = non_empty(overrides.csp_url)
            .or(non_empty(file.csp_url))
            .unwrap_or_else(|| DEFAULT_CSP_URL.to_string());

        let timeout_secs = overrides
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            org_url,
            auth,
            csp_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build the shared client handle
    pub fn build_client(&self) -> Result<TmcClient> {
        let http =
            TmcHttpClient::new(self.request_timeout).context("Failed to build HTTP client")?;

        let credentials = match &self.auth {
            AuthMode::AccessToken(token) => TmcCredentials::access_token(token),
            AuthMode::ApiToken(token) => {
                TmcCredentials::api_token(token, &self.csp_url, http.inner().clone())
                    .context("Invalid CSP URL")?
            }
        };

        let client = TmcClient::new(&self.org_url, credentials, http)
            .context("Invalid TMC organization URL")?;

        tracing::info!("Configured TMC client for {}", self.org_url);
        Ok(client)
    }
}
