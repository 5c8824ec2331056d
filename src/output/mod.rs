//! Report formatters for scan results.
//!
//! All formats render the same [`Report`]: the groups of one scan, the file
//! kept in each group, and an optional preview image per group.
//! - [`text`] for terminals
//! - [`json`] for automation and scripting
//! - [`csv`] for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use romdupe::duplicates::{DuplicateFinder, KeepSelection};
//! use romdupe::output::{json::JsonOutput, Report};
//! use romdupe::error::ExitCode;
//! use std::path::Path;
//!
//! let outcome = DuplicateFinder::with_defaults().scan_directory(Path::new("/roms")).unwrap();
//! let selection = KeepSelection::with_defaults(&outcome.groups);
//! let report = Report::new(&outcome, &selection);
//! println!("{}", JsonOutput::new(&report, ExitCode::Success).to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::actions::images::preview_for_group;
use crate::duplicates::{DuplicateGroup, KeepSelection, ScanOutcome};

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// What happens to a file under the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Keep,
    Delete,
}

impl FileAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Delete => "delete",
        }
    }
}

/// A scan outcome together with the keep selection and preview images.
#[derive(Debug)]
pub struct Report<'a> {
    pub outcome: &'a ScanOutcome,
    pub selection: &'a KeepSelection<'a>,
    previews: BTreeMap<String, PathBuf>,
}

impl<'a> Report<'a> {
    /// Create a report without preview images.
    #[must_use]
    pub fn new(outcome: &'a ScanOutcome, selection: &'a KeepSelection<'a>) -> Self {
        Self {
            outcome,
            selection,
            previews: BTreeMap::new(),
        }
    }

    /// Look up a preview image for every group in `image_dir`.
    #[must_use]
    pub fn with_previews<S: AsRef<str>>(mut self, image_dir: &Path, extensions: &[S]) -> Self {
        self.previews = self
            .outcome
            .groups
            .iter()
            .filter_map(|group| {
                preview_for_group(image_dir, group, extensions)
                    .map(|path| (group.base_name.clone(), path))
            })
            .collect();
        log::debug!(
            "Found preview images for {} of {} groups",
            self.previews.len(),
            self.outcome.groups.len()
        );
        self
    }

    /// Groups in ascending base-name order.
    pub fn groups(&self) -> impl Iterator<Item = &'a DuplicateGroup> {
        self.outcome.groups.iter()
    }

    /// Preview image found for a group, if any.
    #[must_use]
    pub fn preview(&self, base_name: &str) -> Option<&Path> {
        self.previews.get(base_name).map(PathBuf::as_path)
    }

    /// Action for one member of a group.
    #[must_use]
    pub fn action(&self, group: &DuplicateGroup, filename: &str) -> FileAction {
        if self.selection.is_kept(&group.base_name, filename) {
            FileAction::Keep
        } else {
            FileAction::Delete
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcome.is_empty()
    }
}
