//! Mock FoD API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{AuthApi, ReleaseApi};
use super::models::{BearerToken, ReleasePage, ReleaseSummary, ScanSetup};
use super::pagination::PAGE_SIZE;
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockFodClient::new()
///     .with_releases(MockFodClient::numbered_releases(3))
///     .await;
///
/// let page = mock.list_releases(0).await?;
/// assert_eq!(page.total_count, 3);
/// ```
#[derive(Default)]
pub struct MockFodClient {
    /// Full release collection, served in pages of `PAGE_SIZE`
    releases: Arc<Mutex<Vec<ReleaseSummary>>>,
    /// Scan setup per release id; unknown ids get `Malformed`
    setups: Arc<Mutex<HashMap<u64, ScanSetup>>>,
    /// Token to return from authenticate
    token: Arc<Mutex<Option<BearerToken>>>,
    /// `totalCount` to report instead of the collection length
    reported_total: Arc<Mutex<Option<usize>>>,
    /// Page offset that fails with an invalid response
    failing_offset: Arc<Mutex<Option<usize>>>,
    /// Release id whose scan setup request fails at the transport level
    failing_setup: Arc<Mutex<Option<u64>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Offsets passed to list_releases, in call order
    offsets: Arc<Mutex<Vec<usize>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub authenticate: usize,
    pub list_releases: usize,
    pub get_scan_setup: usize,
}

impl CallCounts {
    /// Calls that needed a bearer token
    pub fn authorized(&self) -> usize {
        self.list_releases + self.get_scan_setup
    }
}

impl MockFodClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases with ids `1..=count`, one application per release.
    pub fn numbered_releases(count: u64) -> Vec<ReleaseSummary> {
        (1..=count)
            .map(|id| ReleaseSummary {
                release_id: id,
                release_name: format!("Release {}", id),
                application_id: 1000 + id,
                application_name: format!("App {}", id),
            })
            .collect()
    }

    /// Configure the release collection.
    pub async fn with_releases(self, releases: Vec<ReleaseSummary>) -> Self {
        *self.releases.lock().await = releases;
        self
    }

    /// Configure the scan setup returned for a release.
    pub async fn with_setup(self, release_id: u64, setup: ScanSetup) -> Self {
        self.setups.lock().await.insert(release_id, setup);
        self
    }

    /// Configure the token to return from authenticate.
    pub async fn with_token(self, token: &str) -> Self {
        *self.token.lock().await = Some(BearerToken::new(token));
        self
    }

    /// Report `total` as `totalCount` regardless of the configured collection.
    pub async fn with_reported_total(self, total: usize) -> Self {
        *self.reported_total.lock().await = Some(total);
        self
    }

    /// Make the page at `offset` fail to decode.
    pub async fn fail_page_at(self, offset: usize) -> Self {
        *self.failing_offset.lock().await = Some(offset);
        self
    }

    /// Make the scan setup request for `release_id` fail with a network error.
    pub async fn fail_setup_for(self, release_id: u64) -> Self {
        *self.failing_setup.lock().await = Some(release_id);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Offsets requested from list_releases, in call order.
    pub async fn requested_offsets(&self) -> Vec<usize> {
        self.offsets.lock().await.clone()
    }
}

#[async_trait]
impl AuthApi for MockFodClient {
    async fn authenticate(&self, _api_key: &str, _api_secret: &str) -> Result<Option<BearerToken>> {
        self.call_count.lock().await.authenticate += 1;
        Ok(self.token.lock().await.clone())
    }
}

#[async_trait]
impl ReleaseApi for MockFodClient {
    async fn list_releases(&self, offset: usize) -> Result<ReleasePage> {
        self.call_count.lock().await.list_releases += 1;
        self.offsets.lock().await.push(offset);

        if *self.failing_offset.lock().await == Some(offset) {
            return Err(ApiError::InvalidResponse(format!(
                "Failed to parse releases page at offset {}",
                offset
            ))
            .into());
        }

        let releases = self.releases.lock().await;
        let total_count = self.reported_total.lock().await.unwrap_or(releases.len());
        let start = offset.min(releases.len());
        let end = (offset + PAGE_SIZE).min(releases.len());

        Ok(ReleasePage {
            items: releases[start..end].to_vec(),
            total_count,
        })
    }

    async fn get_scan_setup(&self, release_id: u64) -> Result<ScanSetup> {
        self.call_count.lock().await.get_scan_setup += 1;

        if *self.failing_setup.lock().await == Some(release_id) {
            return Err(ApiError::Network("Failed to connect to API".to_string()).into());
        }

        Ok(self
            .setups
            .lock()
            .await
            .get(&release_id)
            .cloned()
            .unwrap_or_else(|| ScanSetup::Malformed("no scan setup configured".to_string())))
    }
}
