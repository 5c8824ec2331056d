//! Multi-part release detection.
//!
//! A multi-part set is a group of files that together form one release
//! (disc 1 and disc 2, side A and side B, tape 1 of 3). Such files share a
//! base name but are companions, not duplicates, so they must never reach
//! the grouping stage.
//!
//! Detection is driven by an ordered list of [`MultiPartRule`] objects. The
//! built-in table is available through [`MultiPartRules::default`]; a custom
//! table can be compiled from pattern sources with
//! [`MultiPartRules::from_patterns`], which fails on the first malformed
//! pattern instead of deferring the error to classification time.
//!
//! # Example
//!
//! ```
//! use romdupe::classifier::MultiPartRules;
//!
//! let rules = MultiPartRules::default();
//! assert!(rules.is_multi_part("Mission Pack (Disc 2).rom"));
//! assert!(!rules.is_multi_part("Mission Pack (USA).rom"));
//! ```

use std::fmt;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Pattern sources of the built-in multi-part table, in evaluation order.
///
/// The first eight only match inside a parenthesized annotation. The last is
/// a catch-all for markers such as "Mission Disk Vol. 1", "Scenery Disk 7" or
/// "Disk 2 of 4" that appear anywhere in the name.
pub const DEFAULT_MULTI_PART_PATTERNS: &[&str] = &[
    r"\(disc\s*[0-9]+\)",
    r"\(disk\s*[0-9]+\)",
    r"\(side\s*[AB0-9]+\)",
    r"\(part\s*[0-9]+\)",
    r"\(cart\s*[0-9]+\)",
    r"\(tape\s*[0-9]+\)",
    r"\(book\s*[0-9]+\)",
    r"\(mission\s*disk\)",
    r"(?:disc|disk|part|vol|volume|side|scenery disk)\s*[0-9IVX]+",
];

/// Error raised when a rule pattern cannot be compiled.
#[derive(Debug, Error)]
#[error("invalid multi-part pattern '{pattern}': {source}")]
pub struct RuleError {
    /// The offending pattern source.
    pub pattern: String,
    /// Underlying regex compilation error.
    #[source]
    pub source: regex::Error,
}

/// A single multi-part detection rule.
pub trait MultiPartRule: Send + Sync + fmt::Debug {
    /// Returns true if `filename` belongs to a multi-part set under this rule.
    fn matches(&self, filename: &str) -> bool;

    /// Human-readable description, used in logs and `config show`.
    fn describe(&self) -> String;
}

/// Case-insensitive regular expression rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
}

impl PatternRule {
    /// Compile a rule from a pattern source. Matching ignores case.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the pattern is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex })
    }

    /// The pattern source this rule was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl MultiPartRule for PatternRule {
    fn matches(&self, filename: &str) -> bool {
        self.regex.is_match(filename)
    }

    fn describe(&self) -> String {
        self.regex.as_str().to_string()
    }
}

/// Ordered list of multi-part rules.
#[derive(Debug)]
pub struct MultiPartRules {
    rules: Vec<Box<dyn MultiPartRule>>,
}

impl MultiPartRules {
    /// Build a rule set from arbitrary rule objects.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn MultiPartRule>>) -> Self {
        Self { rules }
    }

    /// A rule set that never matches.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compile a rule set from pattern sources, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first pattern that fails to compile.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| PatternRule::new(p.as_ref()).map(|r| Box::new(r) as Box<dyn MultiPartRule>))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Append a rule at the end of the evaluation order.
    pub fn push(&mut self, rule: Box<dyn MultiPartRule>) {
        self.rules.push(rule);
    }

    /// Returns true if any rule matches the filename.
    #[must_use]
    pub fn is_multi_part(&self, filename: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(filename))
    }

    /// Description of the first matching rule, if any.
    #[must_use]
    pub fn matching_rule(&self, filename: &str) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| rule.matches(filename))
            .map(|rule| rule.describe())
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Descriptions of all rules in evaluation order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.describe()).collect()
    }
}

impl Default for MultiPartRules {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_MULTI_PART_PATTERNS)
            .expect("built-in multi-part patterns are valid")
    }
}
