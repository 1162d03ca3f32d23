//! Append-only log of releases that could not be reported

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::Result;

/// Destination for per-release failure entries
pub trait FailureLog {
    /// Record that the given release could not be written to the report
    fn record(&mut self, release_id: u64) -> Result<()>;
}

/// Format one failure entry: `<timestamp> ERROR Release: <id>`
pub fn format_entry(timestamp: DateTime<Local>, release_id: u64) -> String {
    format!(
        "{} ERROR Release: {}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        release_id
    )
}

/// Failure log backed by a file opened in append mode
pub struct FileFailureLog {
    file: File,
}

impl FileFailureLog {
    /// Open (or create) the log file, creating its directory if needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl FailureLog for FileFailureLog {
    fn record(&mut self, release_id: u64) -> Result<()> {
        writeln!(self.file, "{}", format_entry(Local::now(), release_id))?;
        self.file.flush()?;
        Ok(())
    }
}

/// In-memory failure log for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryFailureLog {
    pub entries: Vec<u64>,
}

#[cfg(test)]
impl FailureLog for MemoryFailureLog {
    fn record(&mut self, release_id: u64) -> Result<()> {
        self.entries.push(release_id);
        Ok(())
    }
}
