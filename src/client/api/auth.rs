//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::BearerToken;
use crate::error::Result;

/// Authentication operations for the FoD API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange an API key and secret for a bearer token.
    ///
    /// Returns `Ok(None)` when the grant response carries no `access_token`.
    /// On success the token is kept by the client for every later call.
    async fn authenticate(&self, api_key: &str, api_secret: &str) -> Result<Option<BearerToken>>;
}
