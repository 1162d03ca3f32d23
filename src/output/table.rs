//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::report::ReleaseFailure;

/// Table row for a release that could not be reported
#[derive(Debug, Tabled)]
pub struct FailureRow {
    #[tabled(rename = "RELEASE ID")]
    pub release_id: u64,
    #[tabled(rename = "APPLICATION")]
    pub application: String,
    #[tabled(rename = "REASON")]
    pub reason: String,
}

impl From<&ReleaseFailure> for FailureRow {
    fn from(failure: &ReleaseFailure) -> Self {
        Self {
            release_id: failure.release_id,
            application: failure.application_name.clone(),
            reason: failure.reason.clone(),
        }
    }
}

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}
