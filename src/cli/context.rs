//! Command execution context
//!
//! Resolves settings and builds the API client once, so the report command
//! starts from a ready-to-use client.

use crate::cli::Cli;
use crate::client::FodClient;
use crate::config::Settings;
use crate::error::Result;

/// Context for command execution containing settings and the API client.
pub struct CommandContext {
    /// Resolved run settings
    pub settings: Settings,
    /// API client, not yet authenticated
    pub client: FodClient,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if the settings file cannot be loaded, the settings are
    /// invalid, or the HTTP client cannot be built.
    pub fn new(cli: &Cli) -> Result<Self> {
        let settings = Settings::resolve(cli.config.as_deref(), cli.overrides())?;
        let client = FodClient::from_settings(&settings)?;

        Ok(Self { settings, client })
    }
}
