//! CLI definition and command handlers

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

pub mod context;
pub mod report;

pub use context::CommandContext;

/// Report the dynamic scan configuration of every Fortify on Demand release
#[derive(Parser, Debug)]
#[command(name = "fod-dynconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// FoD API key
    pub api_key: String,

    /// FoD API secret
    pub api_secret: String,

    /// Settings file (YAML)
    #[arg(long, env = "FOD_DYNCONF_CONFIG", hide_env = true)]
    pub config: Option<PathBuf>,

    /// Override the FoD API host
    #[arg(long, env = "FOD_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Where to write the workbook [default: report/DynamicConfigurationReport.xlsx]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Where to append failed release ids [default: log/FodDynamicUpdate.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "FOD_DYNCONF_DEBUG", hide_env = true)]
    pub debug: bool,
}

impl Cli {
    /// Settings overrides given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_host: self.api_host.clone(),
            output: self.output.clone(),
            log_file: self.log_file.clone(),
        }
    }
}
