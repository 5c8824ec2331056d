//! Per-group keep selection.
//!
//! After a scan, each duplicate group needs exactly one file to keep. The
//! default is the first file of the sorted group; callers may override it
//! per group. The resulting deletion plan is every other member.

use std::collections::BTreeMap;

use thiserror::Error;

use super::groups::DuplicateGroupSet;

/// Errors raised while choosing files to keep.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The filename is not a member of any duplicate group.
    #[error("'{0}' is not part of any duplicate group")]
    NotInAnyGroup(String),

    /// The base name does not identify a duplicate group.
    #[error("no duplicate group named '{0}'")]
    UnknownGroup(String),

    /// The filename is not a member of the given group.
    #[error("'{filename}' is not a member of group '{base_name}'")]
    NotInGroup { base_name: String, filename: String },

    /// Two overrides target the same group.
    #[error("conflicting keep choices for group '{base_name}': '{first}' and '{second}'")]
    Conflict {
        base_name: String,
        first: String,
        second: String,
    },
}

/// Which file of each group is kept.
#[derive(Debug, Clone)]
pub struct KeepSelection<'a> {
    groups: &'a DuplicateGroupSet,
    keep: BTreeMap<String, String>,
}

impl<'a> KeepSelection<'a> {
    /// Select the first file of every group.
    #[must_use]
    pub fn with_defaults(groups: &'a DuplicateGroupSet) -> Self {
        let keep = groups
            .iter()
            .filter_map(|g| {
                g.default_keep()
                    .map(|f| (g.base_name.clone(), f.to_string()))
            })
            .collect();
        Self { groups, keep }
    }

    /// Apply a list of filenames to keep, each overriding the default of the
    /// group it belongs to. A name matches a member exactly or in NFC form;
    /// the member's on-disk spelling is what gets kept.
    ///
    /// # Errors
    ///
    /// Fails if a filename is in no group, or if two filenames of the same
    /// group are given.
    pub fn with_overrides<I, S>(groups: &'a DuplicateGroupSet, keep: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::with_defaults(groups);
        let mut overridden: BTreeMap<String, String> = BTreeMap::new();

        for filename in keep {
            let (group, filename) = groups
                .resolve(filename.as_ref())
                .ok_or_else(|| SelectionError::NotInAnyGroup(filename.as_ref().to_string()))?;

            if let Some(previous) = overridden.get(&group.base_name) {
                if previous != filename {
                    return Err(SelectionError::Conflict {
                        base_name: group.base_name.clone(),
                        first: previous.clone(),
                        second: filename.to_string(),
                    });
                }
            }

            overridden.insert(group.base_name.clone(), filename.to_string());
            selection.set_keep(&group.base_name, filename)?;
        }

        Ok(selection)
    }

    /// Choose the file to keep for one group.
    ///
    /// # Errors
    ///
    /// Fails if the group does not exist or the file is not one of its members.
    pub fn set_keep(&mut self, base_name: &str, filename: &str) -> Result<(), SelectionError> {
        let group = self
            .groups
            .get(base_name)
            .ok_or_else(|| SelectionError::UnknownGroup(base_name.to_string()))?;

        if !group.contains(filename) {
            return Err(SelectionError::NotInGroup {
                base_name: base_name.to_string(),
                filename: filename.to_string(),
            });
        }

        log::debug!("Keeping '{}' for group '{}'", filename, base_name);
        self.keep.insert(base_name.to_string(), filename.to_string());
        Ok(())
    }

    /// The file kept for a group.
    #[must_use]
    pub fn kept(&self, base_name: &str) -> Option<&str> {
        self.keep.get(base_name).map(String::as_str)
    }

    /// Check if a file is the kept member of its group.
    #[must_use]
    pub fn is_kept(&self, base_name: &str, filename: &str) -> bool {
        self.kept(base_name) == Some(filename)
    }

    /// Every non-kept file, in group order then file order.
    #[must_use]
    pub fn files_to_delete(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|group| {
                let kept = self.kept(&group.base_name);
                group
                    .files
                    .iter()
                    .filter(move |f| Some(f.as_str()) != kept)
                    .cloned()
            })
            .collect()
    }

    /// The groups this selection applies to.
    #[must_use]
    pub fn groups(&self) -> &'a DuplicateGroupSet {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::duplicates::group_by_base_name;

    fn sample() -> DuplicateGroupSet {
        let (groups, _) = group_by_base_name(
            [
                "A (USA).rom",
                "A (Europe).rom",
                "A (Japan).rom",
                "B (USA).rom",
                "B (Europe).rom",
                "C.rom",
            ],
            &Classifier::default(),
        );
        groups
    }

    #[test]
    fn test_defaults_keep_first() {
        let groups = sample();
        let selection = KeepSelection::with_defaults(&groups);

        assert_eq!(selection.kept("a"), Some("A (Europe).rom"));
        assert_eq!(selection.kept("b"), Some("B (Europe).rom"));
        assert_eq!(
            selection.files_to_delete(),
            vec!["A (Japan).rom", "A (USA).rom", "B (USA).rom"]
        );
    }

    #[test]
    fn test_set_keep() {
        let groups = sample();
        let mut selection = KeepSelection::with_defaults(&groups);
        selection.set_keep("a", "A (USA).rom").unwrap();

        assert!(selection.is_kept("a", "A (USA).rom"));
        assert_eq!(
            selection.files_to_delete(),
            vec!["A (Europe).rom", "A (Japan).rom", "B (USA).rom"]
        );
    }

    #[test]
    fn test_set_keep_rejects_non_member() {
        let groups = sample();
        let mut selection = KeepSelection::with_defaults(&groups);

        assert_eq!(
            selection.set_keep("a", "B (USA).rom"),
            Err(SelectionError::NotInGroup {
                base_name: "a".to_string(),
                filename: "B (USA).rom".to_string(),
            })
        );
        assert_eq!(
            selection.set_keep("c", "C.rom"),
            Err(SelectionError::UnknownGroup("c".to_string()))
        );
    }

    #[test]
    fn test_overrides() {
        let groups = sample();
        let selection = KeepSelection::with_overrides(&groups, ["A (Japan).rom"]).unwrap();
        assert_eq!(selection.kept("a"), Some("A (Japan).rom"));
        assert_eq!(selection.kept("b"), Some("B (Europe).rom"));
    }

    #[test]
    fn test_overrides_unknown_file() {
        let groups = sample();
        let err = KeepSelection::with_overrides(&groups, ["C.rom"]).unwrap_err();
        assert_eq!(err, SelectionError::NotInAnyGroup("C.rom".to_string()));
    }

    #[test]
    fn test_overrides_match_decomposed_names() {
        let (groups, _) = group_by_base_name(
            ["Pok\u{e9}mon (USA).gb", "Pok\u{e9}mon (Europe).gb"],
            &Classifier::default(),
        );
        let selection =
            KeepSelection::with_overrides(&groups, ["Poke\u{301}mon (USA).gb"]).unwrap();
        assert_eq!(selection.kept("pok\u{e9}mon"), Some("Pok\u{e9}mon (USA).gb"));
    }

    #[test]
    fn test_overrides_keep_on_disk_spelling() {
        let (groups, _) = group_by_base_name(
            ["Poke\u{301}mon (USA).gb", "Poke\u{301}mon (Europe).gb"],
            &Classifier::default(),
        );
        let selection =
            KeepSelection::with_overrides(&groups, ["Pok\u{e9}mon (USA).gb"]).unwrap();
        assert_eq!(selection.kept("pok\u{e9}mon"), Some("Poke\u{301}mon (USA).gb"));
        assert_eq!(selection.files_to_delete(), vec!["Poke\u{301}mon (Europe).gb"]);
    }

    #[test]
    fn test_overrides_conflict() {
        let groups = sample();
        let err =
            KeepSelection::with_overrides(&groups, ["A (USA).rom", "A (Japan).rom"]).unwrap_err();
        assert!(matches!(err, SelectionError::Conflict { .. }));
    }

    #[test]
    fn test_one_file_always_preserved() {
        let groups = sample();
        let selection = KeepSelection::with_defaults(&groups);
        let doomed = selection.files_to_delete();

        for group in &groups {
            let survivors = group.files.iter().filter(|f| !doomed.contains(f)).count();
            assert_eq!(survivors, 1);
        }
    }
}
