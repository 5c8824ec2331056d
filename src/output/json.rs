//! JSON report formatter.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-05-01T12:00:00Z",
//!   "root": "/roms",
//!   "groups": [
//!     {
//!       "base_name": "super game",
//!       "files": ["Super Game (Europe).rom", "Super Game (USA).rom"],
//!       "keep": "Super Game (Europe).rom",
//!       "delete": ["Super Game (USA).rom"],
//!       "preview": "/images/Super Game (Europe).png"
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 120,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "redundant_files": 1,
//!     "multi_part_skipped": 4,
//!     "unnamed_skipped": 0,
//!     "scan_duration_ms": 3,
//!     "exit_code": 0,
//!     "exit_code_name": "RM000"
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{FileAction, Report};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    pub base_name: String,
    /// All members, sorted
    pub files: Vec<String>,
    pub keep: Option<String>,
    pub delete: Vec<String>,
    /// Preview image path, when an image directory was given
    pub preview: Option<String>,
}

impl JsonDuplicateGroup {
    fn from_report(report: &Report<'_>, group: &DuplicateGroup) -> Self {
        let (keep, delete): (Vec<_>, Vec<_>) = group
            .files
            .iter()
            .partition(|f| report.action(group, f) == FileAction::Keep);

        Self {
            base_name: group.base_name.clone(),
            files: group.files.clone(),
            keep: keep.into_iter().next().cloned(),
            delete: delete.into_iter().cloned().collect(),
            preview: report
                .preview(&group.base_name)
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    /// Files the current selection would delete
    pub redundant_files: usize,
    pub multi_part_skipped: usize,
    /// Files whose base name normalized to nothing
    pub unnamed_skipped: usize,
    pub scan_duration_ms: u64,
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "RM000")
    pub exit_code_name: String,
}

impl JsonSummary {
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            redundant_files: summary.redundant_files,
            multi_part_skipped: summary.grouping.multi_part_skipped,
            unnamed_skipped: summary.grouping.unnamed_skipped,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub generated_at: DateTime<Utc>,
    pub root: String,
    pub groups: Vec<JsonDuplicateGroup>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a report.
    #[must_use]
    pub fn new(report: &Report<'_>, exit_code: ExitCode) -> Self {
        let summary = &report.outcome.summary;
        let mut json_summary = JsonSummary::from_scan_summary(summary, exit_code);
        json_summary.redundant_files = report.selection.files_to_delete().len();

        Self {
            generated_at: Utc::now(),
            root: summary.root.to_string_lossy().into_owned(),
            groups: report
                .groups()
                .map(|g| JsonDuplicateGroup::from_report(report, g))
                .collect(),
            summary: json_summary,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
