//! Grouping filenames by base name.
//!
//! # Overview
//!
//! [`group_by_base_name`] is the whole duplicate-detection pass: every
//! filename is classified, multi-part files and names without a base name are
//! dropped, the rest are bucketed by base name, and only buckets holding two
//! or more files survive as [`DuplicateGroup`]s.
//!
//! # Example
//!
//! ```
//! use romdupe::classifier::Classifier;
//! use romdupe::duplicates::group_by_base_name;
//!
//! let classifier = Classifier::default();
//! let (groups, stats) =
//!     group_by_base_name(["A (USA).rom", "A (Europe).rom", "B.rom"], &classifier);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups.get("a").unwrap().files, vec!["A (Europe).rom", "A (USA).rom"]);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::classifier::{Classification, Classifier};
use crate::scanner::path_utils::normalize_path_str_cow;

/// A set of two or more filenames sharing a base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Normalized title shared by every file in the group
    pub base_name: String,
    /// Raw filenames, sorted lexicographically
    pub files: Vec<String>,
}

impl DuplicateGroup {
    /// Create a group, sorting the filenames.
    #[must_use]
    pub fn new(base_name: impl Into<String>, mut files: Vec<String>) -> Self {
        files.sort();
        Self {
            base_name: base_name.into(),
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The default file to keep (first in sorted order).
    #[must_use]
    pub fn default_keep(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }

    /// Number of redundant copies (total - 1 kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Check if a filename belongs to this group.
    #[must_use]
    pub fn contains(&self, filename: &str) -> bool {
        self.files.iter().any(|f| f == filename)
    }

    /// The member stored under `filename`, matched exactly or, failing that,
    /// in NFC form. Returns the name as listed on disk.
    #[must_use]
    pub fn member(&self, filename: &str) -> Option<&str> {
        if let Some(file) = self.files.iter().find(|f| *f == filename) {
            return Some(file.as_str());
        }
        let wanted = normalize_path_str_cow(filename);
        self.files
            .iter()
            .find(|f| normalize_path_str_cow(f.as_str()) == wanted)
            .map(String::as_str)
    }
}

/// All duplicate groups found by one scan, keyed and ordered by base name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroupSet {
    groups: BTreeMap<String, DuplicateGroup>,
}

impl DuplicateGroupSet {
    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up a group by base name.
    #[must_use]
    pub fn get(&self, base_name: &str) -> Option<&DuplicateGroup> {
        self.groups.get(base_name)
    }

    /// Iterate over groups in base-name order.
    pub fn iter(&self) -> btree_map::Values<'_, String, DuplicateGroup> {
        self.groups.values()
    }

    /// Base names in order.
    pub fn base_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Total number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(DuplicateGroup::len).sum()
    }

    /// Find the group containing a filename.
    #[must_use]
    pub fn group_of(&self, filename: &str) -> Option<&DuplicateGroup> {
        self.resolve(filename).map(|(group, _)| group)
    }

    /// Find the group containing a filename along with the member's on-disk
    /// name. See [`DuplicateGroup::member`].
    #[must_use]
    pub fn resolve(&self, filename: &str) -> Option<(&DuplicateGroup, &str)> {
        self.groups
            .values()
            .find_map(|g| g.member(filename).map(|member| (g, member)))
    }
}

impl<'a> IntoIterator for &'a DuplicateGroupSet {
    type Item = &'a DuplicateGroup;
    type IntoIter = btree_map::Values<'a, String, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.values()
    }
}

/// Statistics from the grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Total number of filenames processed
    pub total_files: usize,
    /// Filenames skipped as part of a multi-part set
    pub multi_part_skipped: usize,
    /// Filenames skipped because their base name was empty
    pub unnamed_skipped: usize,
    /// Number of distinct base names before filtering
    pub unique_titles: usize,
    /// Files whose base name was shared by no other file
    pub eliminated_unique: usize,
    /// Number of duplicate groups (2+ files)
    pub duplicate_groups: usize,
    /// Files across all duplicate groups
    pub grouped_files: usize,
}

/// Group filenames by base name.
///
/// Multi-part files are skipped before normalization; files with an empty
/// base name are skipped after. Surviving groups have at least two members,
/// each sorted lexicographically, so the result does not depend on input
/// order.
///
/// # Arguments
///
/// * `filenames` - Filenames from a directory listing (files only)
/// * `classifier` - Multi-part rules and normalization
#[must_use]
pub fn group_by_base_name<I, S>(
    filenames: I,
    classifier: &Classifier,
) -> (DuplicateGroupSet, GroupingStats)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut candidates: HashMap<String, Vec<String>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for filename in filenames {
        let filename = filename.into();
        stats.total_files += 1;

        match classifier.classify(&filename) {
            Classification::MultiPart => {
                log::trace!("Ignoring multi-part set: {}", filename);
                stats.multi_part_skipped += 1;
            }
            Classification::Unnamed => {
                log::debug!("No base name for {}, skipping", filename);
                stats.unnamed_skipped += 1;
            }
            Classification::Title(base) => {
                log::trace!("File: {} -> Base: {}", filename, base);
                candidates.entry(base).or_default().push(filename);
            }
        }
    }

    stats.unique_titles = candidates.len();

    let groups: BTreeMap<String, DuplicateGroup> = candidates
        .into_iter()
        .filter(|(base, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!("Unique title {}: {}", base, files[0]);
                false
            } else {
                stats.grouped_files += files.len();
                log::debug!("Title '{}': {} variants", base, files.len());
                true
            }
        })
        .map(|(base, files)| (base.clone(), DuplicateGroup::new(base, files)))
        .collect();

    stats.duplicate_groups = groups.len();

    log::info!(
        "Grouping complete: {} files → {} duplicate groups ({} multi-part skipped)",
        stats.total_files,
        stats.duplicate_groups,
        stats.multi_part_skipped
    );

    (DuplicateGroupSet { groups }, stats)
}
