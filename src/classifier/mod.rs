//! Filename classification.
//!
//! This module turns a single ROM filename into the information the grouper
//! needs:
//! - whether the file is one part of a multi-part release ([`rules`])
//! - the normalized title used as the grouping key ([`base_name`])
//!
//! Everything here is pure and deterministic. The only configurable input is
//! the multi-part rule table held by [`Classifier`].
//!
//! # Example
//!
//! ```
//! use romdupe::classifier::{Classification, Classifier};
//!
//! let classifier = Classifier::default();
//!
//! assert_eq!(
//!     classifier.classify("Super Game (USA).rom"),
//!     Classification::Title("super game".to_string())
//! );
//! assert_eq!(
//!     classifier.classify("Mission Pack (Disc 2).rom"),
//!     Classification::MultiPart
//! );
//! ```

pub mod base_name;
pub mod rules;

use std::sync::LazyLock;

use crate::scanner::path_utils::normalize_path_str;

pub use base_name::{get_base_name, strip_extension, SEQUEL_MIN_LEN, SUBTITLE_SEPARATORS};
pub use rules::{
    MultiPartRule, MultiPartRules, PatternRule, RuleError, DEFAULT_MULTI_PART_PATTERNS,
};

static DEFAULT_RULES: LazyLock<MultiPartRules> = LazyLock::new(MultiPartRules::default);

/// Check a filename against the built-in multi-part table.
///
/// Use [`Classifier::is_multi_part`] to apply a configured table instead.
#[must_use]
pub fn is_multi_part(filename: &str) -> bool {
    DEFAULT_RULES.is_multi_part(filename)
}

/// Outcome of classifying one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Part of a multi-part set; never a duplicate candidate.
    MultiPart,
    /// Normalization left nothing to group on.
    Unnamed,
    /// A groupable title with its base name in NFC form.
    Title(String),
}

/// Classifier applying a multi-part rule table and base-name normalization.
#[derive(Debug, Default)]
pub struct Classifier {
    rules: MultiPartRules,
}

impl Classifier {
    /// Create a classifier with a custom rule table.
    #[must_use]
    pub fn new(rules: MultiPartRules) -> Self {
        Self { rules }
    }

    /// The multi-part rule table in use.
    #[must_use]
    pub fn rules(&self) -> &MultiPartRules {
        &self.rules
    }

    /// Returns true if the filename belongs to a multi-part set.
    #[must_use]
    pub fn is_multi_part(&self, filename: &str) -> bool {
        self.rules.is_multi_part(filename)
    }

    /// Classify a filename.
    ///
    /// The multi-part check runs first: a multi-part file is reported as
    /// such regardless of its base name. Titles are keyed in NFC so composed
    /// and decomposed spellings of a name land in the same group.
    #[must_use]
    pub fn classify(&self, filename: &str) -> Classification {
        if self.is_multi_part(filename) {
            return Classification::MultiPart;
        }

        let base = get_base_name(filename);
        if base.is_empty() {
            Classification::Unnamed
        } else {
            Classification::Title(normalize_path_str(&base))
        }
    }
}
