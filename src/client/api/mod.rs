//! API trait definitions split by responsibility
//!
//! - [`AuthApi`] - token exchange
//! - [`ReleaseApi`] - release listing and per-release scan setup
//!
//! The [`FodApi`](super::FodApi) super-trait combines both.

mod auth;
mod releases;

pub use auth::AuthApi;
pub use releases::ReleaseApi;
