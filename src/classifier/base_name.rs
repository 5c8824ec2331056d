//! Filename to base-name normalization.
//!
//! [`get_base_name`] reduces a ROM filename to the title it represents so
//! that regional and revision variants compare equal:
//!
//! | Filename | Base name |
//! |---|---|
//! | `Super Game (USA).rom` | `super game` |
//! | `Super Game (Europe) (Rev 1).rom` | `super game` |
//! | `Long Title - Subtitle II.rom` | `long title - subtitle` |
//! | `R-Type II.rom` | `r-type ii` |
//!
//! The transform runs five stages in order, each on the output of the
//! previous one:
//!
//! 1. strip the extension (from the last `.`, unless it is the first char)
//! 2. remove every `(...)` / `[...]` annotation with its leading whitespace
//! 3. keep only the text before the first `+` (compilations)
//! 4. strip a trailing sequel numeral, only for long subtitled titles
//! 5. strip trailing whitespace, `-` and `_`, trim, lower-case

use std::sync::LazyLock;

use regex::Regex;

/// Annotation span with optional leading whitespace, non-greedy per span.
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[(\[].*?[)\]]").expect("Invalid annotation regex"));

/// Trailing Arabic numeral or Roman numeral I..VIII preceded by whitespace.
static SEQUEL_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:[0-9]+|I|II|III|IV|V|VI|VII|VIII)$").expect("Invalid numeral regex")
});

/// Titles must be longer than this (in characters) before a trailing
/// numeral is considered a sequel marker rather than part of the title.
pub const SEQUEL_MIN_LEN: usize = 15;

/// Separators that mark a title as subtitled.
pub const SUBTITLE_SEPARATORS: &[char] = &['-', ':'];

/// Compute the normalized base name of a filename.
///
/// The result may be empty (e.g. a name made only of annotations); callers
/// grouping by base name must skip empty results.
///
/// # Example
///
/// ```
/// use romdupe::classifier::get_base_name;
///
/// assert_eq!(get_base_name("Super Game (Europe) (Rev 1).rom"), "super game");
/// assert_eq!(get_base_name("R-Type II.rom"), "r-type ii");
/// assert_eq!(get_base_name("[BIOS] (World).bin"), "");
/// ```
#[must_use]
pub fn get_base_name(filename: &str) -> String {
    let name = strip_extension(filename);
    let name = ANNOTATION.replace_all(name, "");
    let name = strip_compilation(&name);
    let name = strip_sequel_numeral(name);
    name.trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .trim()
        .to_lowercase()
}

/// Remove the extension, leaving leading-dot names untouched.
///
/// ```
/// use romdupe::classifier::strip_extension;
///
/// assert_eq!(strip_extension("Game (USA).rom"), "Game (USA)");
/// assert_eq!(strip_extension(".hidden"), ".hidden");
/// assert_eq!(strip_extension("NoExtension"), "NoExtension");
/// ```
#[must_use]
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

fn strip_compilation(name: &str) -> &str {
    name.split('+').next().unwrap_or(name)
}

fn strip_sequel_numeral(name: &str) -> &str {
    let subtitled = name.contains(SUBTITLE_SEPARATORS);
    if subtitled && name.chars().count() > SEQUEL_MIN_LEN {
        if let Some(m) = SEQUEL_NUMERAL.find(name) {
            return &name[..m.start()];
        }
    }
    name
}
