//! CSV report formatter.
//!
//! One row per grouped file.
//!
//! # Columns
//!
//! - `base_name`: normalized title shared by the group
//! - `filename`: ROM filename
//! - `action`: `keep` or `delete` under the current selection

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::Report;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    base_name: &'a str,
    filename: &'a str,
    action: &'static str,
}

/// CSV output formatter.
pub struct CsvOutput<'r, 'a> {
    report: &'r Report<'a>,
}

impl<'r, 'a> CsvOutput<'r, 'a> {
    #[must_use]
    pub fn new(report: &'r Report<'a>) -> Self {
        Self { report }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.report.is_empty() {
            csv_writer.write_record(["base_name", "filename", "action"])?;
        }

        for group in self.report.groups() {
            for file in &group.files {
                csv_writer.serialize(CsvRow {
                    base_name: &group.base_name,
                    filename: file,
                    action: self.report.action(group, file).as_str(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
