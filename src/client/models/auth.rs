//! Authentication models

use std::fmt;

use serde::Deserialize;

/// Bearer token issued by the client-credentials grant.
///
/// Valid for one run only; it is never written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the `Authorization` header
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Body of `POST /oauth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Missing when the grant was rejected
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}
