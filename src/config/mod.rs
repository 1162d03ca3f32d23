//! Run settings for fod-dynconf
//!
//! Settings come from three layers. CLI flags (and their environment variables)
//! win over values from an optional YAML file, which win over the built-in
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Fortify on Demand API host
pub const DEFAULT_API_HOST: &str = "https://api.ams.fortify.com";

/// Default location of the generated workbook
pub const DEFAULT_OUTPUT: &str = "report/DynamicConfigurationReport.xlsx";

/// Default location of the failure log
pub const DEFAULT_LOG_FILE: &str = "log/FodDynamicUpdate.log";

/// Resolved settings for one report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the FoD API
    pub api_host: String,

    /// Workbook output path
    pub output: PathBuf,

    /// Failure log path
    pub log_file: PathBuf,

    /// HTTP request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,

    /// Outgoing request pacing
    pub requests_per_second: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            timeout_secs: 60,
            requests_per_second: 10,
        }
    }
}

/// Per-run overrides collected from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_host: Option<String>,
    pub output: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(settings)
    }

    /// Resolve settings from an optional file plus CLI overrides, then validate
    pub fn resolve(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut settings = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };

        if let Some(host) = overrides.api_host {
            settings.api_host = host;
        }
        if let Some(output) = overrides.output {
            settings.output = output;
        }
        if let Some(log_file) = overrides.log_file {
            settings.log_file = log_file;
        }

        settings.api_host = settings.api_host.trim_end_matches('/').to_string();
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.api_host.trim().is_empty() {
            return Err(ConfigError::Invalid("api_host must not be empty".to_string()).into());
        }
        if !self.api_host.starts_with("http://") && !self.api_host.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_host must be an http(s) URL, got '{}'",
                self.api_host
            ))
            .into());
        }
        if self.requests_per_second == 0 {
            return Err(
                ConfigError::Invalid("requests_per_second must be at least 1".to_string()).into(),
            );
        }
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output path must not be empty".to_string()).into());
        }
        Ok(())
    }
}
