//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Grouping filenames by base name ([`groups`])
//! - Running a full directory scan ([`finder`])
//! - Choosing which file of each group to keep ([`selection`])

pub mod finder;
pub mod groups;
pub mod selection;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanOutcome, ScanSummary};
pub use groups::{group_by_base_name, DuplicateGroup, DuplicateGroupSet, GroupingStats};
pub use selection::{KeepSelection, SelectionError};
