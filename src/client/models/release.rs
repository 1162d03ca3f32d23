//! Release models

use serde::{Deserialize, Serialize};

/// One entry of the releases collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    /// Release ID; 0 means the application has no release
    pub release_id: u64,

    pub release_name: String,

    pub application_id: u64,

    pub application_name: String,
}

/// A single page of `GET /api/v3/releases`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePage {
    /// Releases on this page, in API order
    pub items: Vec<ReleaseSummary>,

    /// Number of releases across all pages
    pub total_count: usize,
}
