//! HTTP utilities for TMC REST API calls

use super::error::{Result, TmcError};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// User agent sent with every request
const USER_AGENT: &str = concat!("tmc-provider/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Extract the human readable message from a TMC error body
///
/// TMC answers errors with `{"error": "...", "code": n, "message": "..."}`;
/// anything else is reported as the sanitized raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| sanitize_for_log(body))
}

/// Map a non-success status onto the error taxonomy
pub fn status_error(status: StatusCode, url: &Url, body: &str) -> TmcError {
    let message = error_message(body);
    match status {
        StatusCode::NOT_FOUND => TmcError::NotFound {
            path: url.path().to_string(),
        },
        StatusCode::UNAUTHORIZED => TmcError::Unauthorized { message },
        StatusCode::FORBIDDEN => TmcError::Forbidden { message },
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => TmcError::Conflict { message },
        _ => TmcError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

/// HTTP client wrapper for TMC API calls
#[derive(Clone)]
pub struct TmcHttpClient {
    client: Client,
}

impl TmcHttpClient {
    /// Create a new HTTP client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Underlying reqwest client, shared with the token exchange
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request
    pub async fn get(&self, url: &Url, token: &str) -> Result<Value> {
        self.execute(Method::GET, url, token, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &Url, token: &str, body: &Value) -> Result<Value> {
        self.execute(Method::POST, url, token, Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &Url, token: &str, body: &Value) -> Result<Value> {
        self.execute(Method::PUT, url, token, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &Url, token: &str) -> Result<Value> {
        self.execute(Method::DELETE, url, token, None).await
    }

    async fn execute(
        &self,
        method: Method,
        url: &Url,
        token: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url.clone()).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            if status == StatusCode::NOT_FOUND {
                tracing::debug!("API returned 404 for {}", url.path());
            } else {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
            }
            return Err(status_error(status, url, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            TmcError::decode(format!("response from {} is not JSON: {}", url.path(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://org.tmc.cloud.vmware.com/v1alpha1/clusters/c1").unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, &url(), ""),
            TmcError::NotFound { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, &url(), ""),
            TmcError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, &url(), ""),
            TmcError::Forbidden { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::CONFLICT, &url(), ""),
            TmcError::Conflict { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, &url(), ""),
            TmcError::Remote { status: 502, .. }
        ));
    }

    #[test]
    fn test_remote_error_carries_server_message() {
        let body = r#"{"error":"invalid","code":3,"message":"cluster group does not exist"}"#;
        match status_error(StatusCode::BAD_REQUEST, &url(), body) {
            TmcError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "cluster group does not exist");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < body.len());
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }
}
