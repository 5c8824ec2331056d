//! Preview image lookup.
//!
//! Front-end collections keep box art and screenshots in a separate folder,
//! named after the ROM with the ROM's extension replaced by an image one:
//! `Super Game (USA).sfc` → `Super Game (USA).png`.
//!
//! # Example
//!
//! ```no_run
//! use romdupe::actions::images::{find_preview_image, DEFAULT_IMAGE_EXTENSIONS};
//! use std::path::Path;
//!
//! let image = find_preview_image(
//!     Path::new("/media/images"),
//!     "Super Game (USA).sfc",
//!     DEFAULT_IMAGE_EXTENSIONS,
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::classifier::strip_extension;
use crate::duplicates::DuplicateGroup;

/// Image extensions tried, in order, when looking for a preview.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp"];

/// Filename stem used for companion images.
#[must_use]
pub fn image_stem(rom_filename: &str) -> &str {
    strip_extension(rom_filename)
}

/// Candidate image filenames for a ROM, in extension order.
#[must_use]
pub fn image_candidates<S: AsRef<str>>(rom_filename: &str, extensions: &[S]) -> Vec<String> {
    let stem = image_stem(rom_filename);
    extensions
        .iter()
        .map(|ext| format!("{}{}", stem, ext.as_ref()))
        .collect()
}

/// Find the first existing preview image for a ROM.
#[must_use]
pub fn find_preview_image<S: AsRef<str>>(
    image_dir: &Path,
    rom_filename: &str,
    extensions: &[S],
) -> Option<PathBuf> {
    image_candidates(rom_filename, extensions)
        .into_iter()
        .map(|name| image_dir.join(name))
        .find(|path| {
            let found = path.is_file();
            if !found {
                log::trace!("No preview at {}", path.display());
            }
            found
        })
}

/// Find a preview for a group: the first member that has an image wins.
#[must_use]
pub fn preview_for_group<S: AsRef<str>>(
    image_dir: &Path,
    group: &DuplicateGroup,
    extensions: &[S],
) -> Option<PathBuf> {
    group
        .files
        .iter()
        .find_map(|file| find_preview_image(image_dir, file, extensions))
}
