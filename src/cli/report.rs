//! Report command implementation

use indicatif::ProgressBar;
use log::info;

use crate::cli::{Cli, CommandContext};
use crate::client::{FodApi, fetch_all_releases};
use crate::error::{ApiError, Result};
use crate::output;
use crate::report::{
    FailureLog, FileFailureLog, ReportAggregator, ReportWriter, RunSummary, XlsxReportWriter,
};

/// Run the report: authenticate, enumerate releases, write the workbook
pub async fn run(cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;

    let mut writer = XlsxReportWriter::new(&ctx.settings.output);
    let mut failures = FileFailureLog::open(&ctx.settings.log_file)?;

    let summary = generate_report(
        &ctx.client,
        &cli.api_key,
        &cli.api_secret,
        &mut writer,
        &mut failures,
        output::progress_bar(),
    )
    .await?;

    info!(
        "Wrote {} rows to {}",
        summary.rows_written,
        ctx.settings.output.display()
    );
    output::print_summary(&summary, writer.path(), &ctx.settings.log_file);
    Ok(())
}

/// Generate the report against any FoD API implementation.
///
/// A missing token stops the run before any release is requested.
pub async fn generate_report<C, W, L>(
    client: &C,
    api_key: &str,
    api_secret: &str,
    writer: &mut W,
    failures: &mut L,
    progress: ProgressBar,
) -> Result<RunSummary>
where
    C: FodApi + ?Sized,
    W: ReportWriter + ?Sized,
    L: FailureLog + ?Sized,
{
    if client.authenticate(api_key, api_secret).await?.is_none() {
        return Err(ApiError::Unauthorized.into());
    }

    let releases = fetch_all_releases(client).await?;
    info!("Found {} releases", releases.len());

    let mut aggregator = ReportAggregator::new(writer, failures, progress)?;
    aggregator.run(client, &releases).await?;
    aggregator.finish()
}
