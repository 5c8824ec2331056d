//! Scanner module for ROM directory listing.
//!
//! This module is the only place the duplicate pipeline touches the
//! filesystem on the way in:
//! - [`walker`]: single-level enumeration of regular files
//! - [`path_utils`]: NFC forms used when comparing listed names
//!
//! # Example
//!
//! ```no_run
//! use romdupe::scanner::Walker;
//! use std::path::Path;
//!
//! match Walker::new(Path::new("/roms")).filenames() {
//!     Ok(names) => println!("{} files", names.len()),
//!     Err(e) => eprintln!("Scan failed: {}", e),
//! }
//! ```

pub mod path_utils;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

pub use walker::Walker;

/// List the regular files directly inside `dir` with default options.
///
/// # Errors
///
/// See [`Walker::filenames`].
pub fn list_filenames(dir: &Path) -> Result<Vec<String>, ScanError> {
    Walker::new(dir).filenames()
}

/// Errors that can occur while listing a directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The listing was interrupted by a shutdown request.
    #[error("Scan interrupted by user")]
    Interrupted,

    /// An I/O error occurred while reading the directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Map an I/O error to the most specific variant.
    #[must_use]
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
