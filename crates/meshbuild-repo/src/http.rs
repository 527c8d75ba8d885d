//! HTTP client shared by the tree walker and the chart registry
//!
//! Redirects are followed by hand so the bearer token never leaves the origin
//! it was configured for (GitHub redirects raw downloads to a CDN host).

use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{RepoError, Result};

const MAX_REDIRECTS: u32 = 10;

/// HTTP client with origin-scoped bearer auth
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    token: Option<String>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client. `token` is sent as `Authorization: Bearer` to the
    /// origin of each request URL only.
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("meshbuild/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            token,
            timeout,
        })
    }

    /// Client without credentials
    pub fn public() -> Result<Self> {
        Self::new(None, Duration::from_secs(30))
    }

    /// Same-origin check (scheme, host, port)
    pub fn same_origin(url1: &str, url2: &str) -> bool {
        match (Url::parse(url1), Url::parse(url2)) {
            (Ok(u1), Ok(u2)) => {
                u1.scheme() == u2.scheme()
                    && u1.host() == u2.host()
                    && u1.port_or_known_default() == u2.port_or_known_default()
            }
            _ => false,
        }
    }

    /// Fetch a URL, following redirects
    pub async fn get(&self, url: &str, accept: Option<&str>) -> Result<reqwest::Response> {
        let original_url = url.to_string();
        let mut current_url = original_url.clone();
        let mut redirects = 0;

        loop {
            let mut request = self.client.get(&current_url);
            if let Some(accept) = accept {
                request = request.header("Accept", accept);
            }

            if let Some(token) = &self.token {
                if Self::same_origin(&original_url, &current_url) {
                    request = request.bearer_auth(token);
                } else {
                    tracing::debug!(
                        "Cross-origin redirect from {} to {} - token not forwarded",
                        original_url,
                        current_url
                    );
                }
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    RepoError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    RepoError::from(e)
                }
            })?;
            let status = response.status();

            if status.is_redirection() {
                redirects += 1;
                if redirects > MAX_REDIRECTS {
                    return Err(RepoError::NetworkError {
                        message: format!("Too many redirects (max {})", MAX_REDIRECTS),
                    });
                }

                let location = response
                    .headers()
                    .get("Location")
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| RepoError::NetworkError {
                        message: "Redirect without Location header".to_string(),
                    })?;

                let base = Url::parse(&current_url)?;
                current_url = base.join(location)?.to_string();
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                return Err(RepoError::RateLimited { retry_after });
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(RepoError::AuthRequired { url: current_url });
            }
            if status == reqwest::StatusCode::FORBIDDEN {
                // GitHub reports exhausted API quota as 403 with this header
                let exhausted = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    == Some("0");
                if exhausted {
                    let retry_after = response
                        .headers()
                        .get("x-ratelimit-reset")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<i64>().ok())
                        .map(|reset| (reset - chrono::Utc::now().timestamp()).max(0) as u64)
                        .unwrap_or(60);
                    return Err(RepoError::RateLimited { retry_after });
                }
                return Err(RepoError::AuthFailed {
                    message: format!("Access denied to {}", current_url),
                });
            }

            if !status.is_success() {
                return Err(RepoError::HttpError {
                    status: status.as_u16(),
                    message: format!("Request to {} failed", current_url),
                });
            }

            return Ok(response);
        }
    }

    /// Fetch text from URL
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url, None).await?;
        response.text().await.map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })
    }

    /// Fetch and decode a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        let response = self.get(url, Some(accept)).await?;
        let bytes = response.bytes().await.map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| RepoError::ResponseDecode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
