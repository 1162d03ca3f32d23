//! Fortify on Demand API client

pub mod api;
pub mod fod;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use api::{AuthApi, ReleaseApi};
pub use fod::FodClient;
#[cfg(test)]
pub use mock::MockFodClient;
pub use pagination::fetch_all_releases;

/// Combined FoD API surface used by the report command
pub trait FodApi: AuthApi + ReleaseApi {}

impl<T: AuthApi + ReleaseApi> FodApi for T {}
