//! Report writers
//!
//! The report is built in memory and written once by [`ReportWriter::finalize`].
//! Nothing reaches disk before that call.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::row::ReportRow;
use crate::error::{ReportError, Result};

/// Worksheet name of the generated workbook
const SHEET_NAME: &str = "Dynamic Configuration";

/// Column width used for every report column
const COLUMN_WIDTH: f64 = 28.0;

/// Sink for report rows
pub trait ReportWriter {
    /// Write the header row
    fn write_header(&mut self, columns: &[&str]) -> Result<()>;

    /// Append one data row after the rows already written
    fn append_row(&mut self, row: &ReportRow) -> Result<()>;

    /// Persist the report; called once at the end of a run
    fn finalize(&mut self) -> Result<()>;
}

/// Writes the report as an `.xlsx` workbook with a single worksheet
pub struct XlsxReportWriter {
    path: PathBuf,
    worksheet: Option<Worksheet>,
    next_row: u32,
}

impl XlsxReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            worksheet: Some(Worksheet::new()),
            next_row: 0,
        }
    }

    /// Destination of the workbook
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn worksheet(&mut self) -> Result<&mut Worksheet> {
        Ok(self.worksheet.as_mut().ok_or(ReportError::Finalized)?)
    }
}

impl ReportWriter for XlsxReportWriter {
    fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        let header_format = Format::new().set_bold();
        let worksheet = self.worksheet()?;

        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            worksheet
                .write_string_with_format(0, col, *name, &header_format)
                .map_err(ReportError::from)?;
            worksheet
                .set_column_width(col, COLUMN_WIDTH)
                .map_err(ReportError::from)?;
        }

        self.next_row = 1;
        Ok(())
    }

    fn append_row(&mut self, row: &ReportRow) -> Result<()> {
        let row_index = self.next_row;
        let worksheet = self.worksheet()?;

        for (col, value) in row.cells().iter().enumerate() {
            worksheet
                .write_string(row_index, col as u16, *value)
                .map_err(ReportError::from)?;
        }

        self.next_row += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let mut worksheet = self.worksheet.take().ok_or(ReportError::Finalized)?;
        worksheet.set_name(SHEET_NAME).map_err(ReportError::from)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        workbook.save(&self.path).map_err(ReportError::from)?;

        Ok(())
    }
}

/// In-memory writer for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryReportWriter {
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub finalized: usize,
    /// Appending a row for this application fails
    pub fail_for: Option<String>,
}

#[cfg(test)]
impl ReportWriter for MemoryReportWriter {
    fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        self.header = columns.iter().map(|c| c.to_string()).collect();
        Ok(())
    }

    fn append_row(&mut self, row: &ReportRow) -> Result<()> {
        if self.fail_for.as_deref() == Some(row.application.as_str()) {
            return Err(ReportError::Xlsx("simulated write failure".to_string()).into());
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.finalized += 1;
        Ok(())
    }
}
