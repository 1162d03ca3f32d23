//! Fortify on Demand API data models

mod auth;
mod release;
mod scan_setup;

pub use auth::{BearerToken, TokenResponse};
pub use release::{ReleasePage, ReleaseSummary};
pub use scan_setup::{DynamicScanConfig, ScanSetup};
