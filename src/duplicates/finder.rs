//! Duplicate finder: directory listing followed by base-name grouping.
//!
//! # Overview
//!
//! [`DuplicateFinder::find_duplicates`] runs one complete scan:
//! 1. **Listing**: enumerate the files of the ROM directory ([`crate::scanner::Walker`])
//! 2. **Grouping**: classify and group by base name ([`group_by_base_name`])
//!
//! A scan either produces a fresh [`DuplicateGroupSet`] or fails with
//! [`FinderError`]. Listing failures abort before grouping runs, so the
//! caller never sees a set built from a partial listing and can tell
//! "no duplicates" (`Ok` with an empty set) apart from "scan failed".
//!
//! # Example
//!
//! ```no_run
//! use romdupe::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new("/roms")).unwrap();
//! println!("{} groups, {} files", summary.duplicate_groups, summary.duplicate_files);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::groups::{group_by_base_name, DuplicateGroupSet, GroupingStats};
use crate::classifier::Classifier;
use crate::scanner::{ScanError, Walker};

/// Configuration for a scan.
#[derive(Debug, Default)]
pub struct FinderConfig {
    /// Multi-part rules and normalization.
    pub classifier: Classifier,
    /// Skip dot-files in the ROM directory.
    pub skip_hidden: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl FinderConfig {
    /// Use a specific classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Skip hidden files.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

/// Summary of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Directory that was scanned
    pub root: PathBuf,
    /// Number of files listed
    pub total_files: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files across all groups
    pub duplicate_files: usize,
    /// Files that would be removed with the default selection
    pub redundant_files: usize,
    /// Grouping statistics
    pub grouping: GroupingStats,
    /// Duration of the whole scan
    #[serde(skip)]
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Human-readable one-line summary.
    #[must_use]
    pub fn message(&self) -> String {
        if self.duplicate_groups == 0 {
            "Scan complete. No duplicates found.".to_string()
        } else {
            format!(
                "Scan complete. Found {} duplicate groups with a total of {} files.",
                self.duplicate_groups, self.duplicate_files
            )
        }
    }
}

/// Result of one successful scan: the groups and how they were obtained.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanOutcome {
    pub groups: DuplicateGroupSet,
    pub summary: ScanSummary,
}

impl ScanOutcome {
    /// True when the scan found no duplicate groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Errors that can occur during a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// Listing the directory failed.
    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Interrupted => Self::Interrupted,
            other => Self::Scan(other),
        }
    }
}

/// Scans a ROM directory for duplicate titles.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with the built-in multi-part rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The classifier used for grouping.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.config.classifier
    }

    /// Scan a directory and group its files.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the directory cannot be fully listed or the
    /// scan is interrupted. No groups are produced in that case.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(DuplicateGroupSet, ScanSummary), FinderError> {
        let start_time = Instant::now();
        log::info!("Starting duplicate scan of {}", path.display());

        let mut walker = Walker::new(path).with_skip_hidden(self.config.skip_hidden);
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        let filenames = walker.filenames()?;
        let (groups, stats) = self.find_duplicates_from_names(filenames);

        let summary = ScanSummary {
            root: path.to_path_buf(),
            total_files: stats.total_files,
            duplicate_groups: groups.len(),
            duplicate_files: groups.file_count(),
            redundant_files: groups.iter().map(|g| g.duplicate_count()).sum(),
            grouping: stats,
            scan_duration: start_time.elapsed(),
        };

        log::info!("{}", summary.message());
        Ok((groups, summary))
    }

    /// Scan a directory into a [`ScanOutcome`].
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates`].
    pub fn scan_directory(&self, path: &Path) -> Result<ScanOutcome, FinderError> {
        let (groups, summary) = self.find_duplicates(path)?;
        Ok(ScanOutcome { groups, summary })
    }

    /// Group an already-listed sequence of filenames.
    #[must_use]
    pub fn find_duplicates_from_names<I, S>(&self, filenames: I) -> (DuplicateGroupSet, GroupingStats)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        group_by_base_name(filenames, &self.config.classifier)
    }
}
