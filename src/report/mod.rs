//! Dynamic configuration report
//!
//! [`ReportAggregator`] walks the release list, fetches each release's scan
//! setup and turns configured releases into report rows. Every release ends in
//! exactly one [`ReleaseOutcome`]; the outcomes are folded into a [`RunSummary`].

use indicatif::ProgressBar;
use log::{debug, warn};

use crate::client::ReleaseApi;
use crate::client::models::{DynamicScanConfig, ReleaseSummary, ScanSetup};
use crate::error::Result;

pub mod failure_log;
pub mod row;
pub mod writer;

pub use failure_log::{FailureLog, FileFailureLog};
pub use row::{REPORT_COLUMNS, ReportRow};
pub use writer::{ReportWriter, XlsxReportWriter};

/// A release that matched but could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFailure {
    pub release_id: u64,
    pub application_name: String,
    pub reason: String,
}

/// What happened to a single release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A row was appended to the report
    Written(ReportRow),
    /// Release id 0: the application has no release
    Skipped,
    /// The application is not a web / thick-client application
    NotApplicable,
    /// Configured, but without a site URL
    NoSiteUrl,
    /// The scan setup response could not be understood
    Malformed(String),
    /// Building or appending the row failed
    Failed(ReleaseFailure),
}

/// Totals for one report run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_releases: usize,
    pub rows_written: usize,
    pub skipped: usize,
    pub not_applicable: usize,
    pub no_site_url: usize,
    pub malformed: usize,
    pub failures: Vec<ReleaseFailure>,
}

impl RunSummary {
    fn record(&mut self, outcome: ReleaseOutcome) {
        match outcome {
            ReleaseOutcome::Written(_) => self.rows_written += 1,
            ReleaseOutcome::Skipped => self.skipped += 1,
            ReleaseOutcome::NotApplicable => self.not_applicable += 1,
            ReleaseOutcome::NoSiteUrl => self.no_site_url += 1,
            ReleaseOutcome::Malformed(_) => self.malformed += 1,
            ReleaseOutcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

/// Percentage of releases handled before the one at `index`, rounded half away from zero
pub fn percent_complete(index: usize, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    (index as f64 / total as f64 * 100.0).round() as u64
}

/// Builds the report from a release list.
///
/// The aggregator borrows its writer and failure log for the duration of the
/// run, so callers keep ownership and can inspect them afterwards.
pub struct ReportAggregator<'a, W: ?Sized, L: ?Sized> {
    writer: &'a mut W,
    failures: &'a mut L,
    progress: ProgressBar,
    summary: RunSummary,
}

impl<'a, W, L> ReportAggregator<'a, W, L>
where
    W: ReportWriter + ?Sized,
    L: FailureLog + ?Sized,
{
    /// Create an aggregator and write the report header.
    ///
    /// `progress` is positioned in percent, so it should have a length of 100.
    pub fn new(writer: &'a mut W, failures: &'a mut L, progress: ProgressBar) -> Result<Self> {
        writer.write_header(&REPORT_COLUMNS)?;
        Ok(Self {
            writer,
            failures,
            progress,
            summary: RunSummary::default(),
        })
    }

    /// Process every release in order.
    ///
    /// Row failures are recorded and skipped; only a failed scan setup request
    /// aborts the run.
    pub async fn run<C>(&mut self, client: &C, releases: &[ReleaseSummary]) -> Result<()>
    where
        C: ReleaseApi + ?Sized,
    {
        let total = releases.len();
        self.summary.total_releases += total;

        for (index, release) in releases.iter().enumerate() {
            let outcome = self.process(client, index, total, release).await?;
            self.summary.record(outcome);
        }

        Ok(())
    }

    /// Handle one release and report what happened to it
    pub async fn process<C>(
        &mut self,
        client: &C,
        index: usize,
        total: usize,
        release: &ReleaseSummary,
    ) -> Result<ReleaseOutcome>
    where
        C: ReleaseApi + ?Sized,
    {
        if release.release_id == 0 {
            return Ok(ReleaseOutcome::Skipped);
        }

        debug!(
            "Checking release {} '{}' of application {} '{}'",
            release.release_id,
            release.release_name,
            release.application_id,
            release.application_name
        );

        let outcome = match client.get_scan_setup(release.release_id).await? {
            ScanSetup::NotApplicable => ReleaseOutcome::NotApplicable,
            ScanSetup::Malformed(reason) => {
                debug!(
                    "Release {}: no usable scan setup ({})",
                    release.release_id, reason
                );
                ReleaseOutcome::Malformed(reason)
            }
            ScanSetup::Configured(config) if config.site_url().is_none() => {
                ReleaseOutcome::NoSiteUrl
            }
            ScanSetup::Configured(config) => self.write_row(release, &config),
        };

        let percent = percent_complete(index, total);
        self.progress.set_position(percent);
        // Redirected stdout hides the bar, so fall back to plain lines
        if self.progress.is_hidden() {
            println!("{}%", percent);
        }

        match &outcome {
            ReleaseOutcome::Written(row) => {
                self.progress
                    .suspend(|| println!("{} Added successfully", row.application));
            }
            ReleaseOutcome::Failed(failure) => {
                self.progress
                    .suspend(|| println!("Error on ID {}", failure.release_id));
                warn!(
                    "Release {} ({}): {}",
                    failure.release_id, failure.application_name, failure.reason
                );
                if let Err(e) = self.failures.record(failure.release_id) {
                    warn!("Could not record failure for release {}: {}", failure.release_id, e);
                }
            }
            _ => {}
        }

        Ok(outcome)
    }

    fn write_row(&mut self, release: &ReleaseSummary, config: &DynamicScanConfig) -> ReleaseOutcome {
        let result = ReportRow::build(&release.application_name, config)
            .map_err(|e| e.to_string())
            .and_then(|row| {
                self.writer
                    .append_row(&row)
                    .map(|()| row)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(row) => ReleaseOutcome::Written(row),
            Err(reason) => ReleaseOutcome::Failed(ReleaseFailure {
                release_id: release.release_id,
                application_name: release.application_name.clone(),
                reason,
            }),
        }
    }

    /// Finalize the report and return the run totals
    pub fn finish(self) -> Result<RunSummary> {
        self.progress.finish_and_clear();
        self.writer.finalize()?;
        Ok(self.summary)
    }
}
