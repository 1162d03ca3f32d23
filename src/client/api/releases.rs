//! Release API trait

use async_trait::async_trait;

use crate::client::models::{ReleasePage, ScanSetup};
use crate::error::Result;

/// Release operations for the FoD API
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Fetch one page of the releases collection starting at `offset`.
    ///
    /// A page that cannot be decoded is an error.
    async fn list_releases(&self, offset: usize) -> Result<ReleasePage>;

    /// Fetch and classify the dynamic scan setup of a release.
    ///
    /// Only transport failures are errors; every response body maps to a [`ScanSetup`].
    async fn get_scan_setup(&self, release_id: u64) -> Result<ScanSetup>;
}
