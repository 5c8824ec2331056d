//! Unicode normalization for filenames.
//!
//! macOS stores filenames in NFD (decomposed) form while Windows and Linux
//! typically use NFC (composed). The same visible title can therefore reach
//! the classifier with two byte representations:
//!
//! - NFC: `Pokémon.gb` with 'é' as U+00E9
//! - NFD: `Pokémon.gb` with 'e' U+0065 + combining acute U+0301
//!
//! Names are compared and keyed in NFC so both variants produce the same
//! base name. The listed name itself is never rewritten: it is the path used
//! for deletion.
//!
//! # Example
//!
//! ```
//! use romdupe::scanner::path_utils::normalize_path_str;
//!
//! let nfc = "Pok\u{e9}mon.gb";
//! let nfd = "Poke\u{0301}mon.gb";
//!
//! assert_eq!(normalize_path_str(nfd), nfc);
//! ```

use std::borrow::Cow;

use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Normalize a filename to NFC form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    normalize_path_str_cow(s).into_owned()
}

/// Normalize a filename to NFC, borrowing when it already is.
#[must_use]
pub fn normalize_path_str_cow(s: &str) -> Cow<'_, str> {
    if is_nfc(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.nfc().collect())
    }
}

/// Check whether a string is already in NFC form.
#[must_use]
pub fn is_nfc(s: &str) -> bool {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => true,
        IsNormalized::No => false,
        IsNormalized::Maybe => s.chars().eq(s.nfc()),
    }
}
