//! Fortify on Demand API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use reqwest::{Client as HttpClient, Response, StatusCode};
use tokio::sync::RwLock;

use super::api::{AuthApi, ReleaseApi};
use super::models::{BearerToken, ReleasePage, ScanSetup, TokenResponse};
use crate::config::Settings;
use crate::error::{ApiError, ConfigError, Result};

/// FoD API client
pub struct FodClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    token: Arc<RwLock<Option<BearerToken>>>,
}

impl FodClient {
    /// Create a client for the given API host.
    ///
    /// `timeout` of `None` lets requests block until the server answers.
    pub fn new(api_host: &str, timeout: Option<Duration>, requests_per_second: u32) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            ConfigError::Invalid("requests_per_second must be at least 1".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            http,
            base_url: api_host.trim_end_matches('/').to_string(),
            rate_limiter,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client from resolved run settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        Self::new(&settings.api_host, timeout, settings.requests_per_second)
    }

    /// Make an authenticated GET request
    async fn get(&self, path: &str) -> Result<Response> {
        // Apply rate limiting
        self.rate_limiter.until_ready().await;

        let token = self
            .token
            .read()
            .await
            .clone()
            .ok_or(ApiError::Unauthorized)?;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", token.as_str()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        Ok(response)
    }
}

/// Map a non-success response to an API error
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string());
            ApiError::NotFound(error_msg)
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            ApiError::RateLimit(Duration::from_secs(retry_after))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Bad request".to_string());
            ApiError::BadRequest(error_msg)
        }
        status if status.is_server_error() => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {}", status));
            ApiError::ServerError(error_msg)
        }
        _ => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
    }
}

#[async_trait]
impl AuthApi for FodClient {
    async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<Option<BearerToken>> {
        // Apply rate limiting
        self.rate_limiter.until_ready().await;

        let url = format!("{}/oauth/token", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Cache-Control", "no-cache")
            .form(&[
                ("scope", "api-tenant"),
                ("grant_type", "client_credentials"),
                ("client_id", api_key),
                ("client_secret", api_secret),
            ])
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        let grant = serde_json::from_str::<TokenResponse>(&response_text).ok();
        let access_token = grant
            .as_ref()
            .and_then(|g| g.access_token.clone())
            .filter(|t| !t.is_empty());

        match (access_token, grant) {
            (Some(access_token), Some(grant)) => {
                debug!(
                    "Issued {} token, expires in {}s",
                    grant.token_type.as_deref().unwrap_or("bearer"),
                    grant.expires_in.unwrap_or_default()
                );
                let token = BearerToken::new(access_token);
                *self.token.write().await = Some(token.clone());
                Ok(Some(token))
            }
            _ => {
                debug!("Token request returned {} without an access token", status);
                println!("{}", response_text);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ReleaseApi for FodClient {
    async fn list_releases(&self, offset: usize) -> Result<ReleasePage> {
        let path = if offset == 0 {
            "/api/v3/releases/".to_string()
        } else {
            format!("/api/v3/releases?offset={}", offset)
        };

        let response = self.get(&path).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await.into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        let page = serde_json::from_str::<ReleasePage>(&body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse releases page at offset {}: {}",
                offset, e
            ))
        })?;

        Ok(page)
    }

    async fn get_scan_setup(&self, release_id: u64) -> Result<ScanSetup> {
        let path = format!("/api/v3/releases/{}/dynamic-scans/scan-setup", release_id);

        let response = self.get(&path).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        // The not-applicable envelope arrives with an error status, so the body decides
        let setup = ScanSetup::from_body(&body);
        match setup {
            ScanSetup::Malformed(reason) if !status.is_success() => {
                warn!("Release {}: scan setup returned {}: {}", release_id, status, reason);
                Ok(ScanSetup::Malformed(format!("{}: {}", status, reason)))
            }
            setup => Ok(setup),
        }
    }
}
