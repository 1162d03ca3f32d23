//! Console output for report runs

use std::path::Path;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::report::RunSummary;

pub mod table;

use table::{FailureRow, format_table};

/// Progress bar positioned in percent complete, drawn on stdout
pub fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Render the end-of-run summary
pub fn format_summary(summary: &RunSummary, report_path: &Path, log_path: &Path) -> String {
    let mut lines = vec![
        format!("{}", "Dynamic Configuration Report".bold()),
        format!("Report file: {}", report_path.display().to_string().cyan()),
        format!("Releases: {}", summary.total_releases),
        format!("{} Rows written: {}", "✓".green(), summary.rows_written),
    ];

    let no_config = summary.not_applicable + summary.malformed;
    lines.push(format!(
        "{} Without dynamic configuration: {}",
        "○".dimmed(),
        no_config
    ));
    lines.push(format!("{} Without site URL: {}", "○".dimmed(), summary.no_site_url));
    if summary.skipped > 0 {
        lines.push(format!(
            "{} Applications without releases: {}",
            "○".dimmed(),
            summary.skipped
        ));
    }

    if !summary.failures.is_empty() {
        lines.push(format!(
            "{} Failed releases: {} (logged to {})",
            "✗".red(),
            summary.failures.len(),
            log_path.display()
        ));
        let rows: Vec<FailureRow> = summary.failures.iter().map(FailureRow::from).collect();
        lines.push(format_table(&rows));
    }

    lines.join("\n")
}

/// Print the end-of-run summary to stdout
pub fn print_summary(summary: &RunSummary, report_path: &Path, log_path: &Path) {
    println!("{}", format_summary(summary, report_path, log_path));
}
