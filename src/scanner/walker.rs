//! ROM directory listing.
//!
//! # Overview
//!
//! [`Walker`] enumerates the regular files directly inside one directory and
//! yields their names. Subdirectories are skipped, not descended into. Names
//! are returned exactly as stored on disk, since they are later joined back
//! onto the directory for deletion.
//!
//! The listing is all-or-nothing: [`Walker::filenames`] returns either every
//! name or the first error, never a partial list.
//!
//! # Example
//!
//! ```no_run
//! use romdupe::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/roms/snes"));
//! for name in walker.filenames().unwrap() {
//!     println!("{}", name);
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::ScanError;

/// Single-level directory walker.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    skip_hidden: bool,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a walker for the given directory.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            skip_hidden: false,
            shutdown_flag: None,
        }
    }

    /// Skip names starting with `.`.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Abort the listing when the flag is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// The directory being listed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|e| ScanError::from_io(self.root.clone(), e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    /// List the names of all regular files in the directory.
    ///
    /// Names are returned in directory order. Entries whose names are not
    /// valid UTF-8 are skipped with a warning since they cannot be
    /// classified as text.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the directory is missing, not a directory,
    /// unreadable, or any entry cannot be read. No names are returned in
    /// that case.
    pub fn filenames(&self) -> Result<Vec<String>, ScanError> {
        self.validate_root()?;
        log::debug!("Listing {}", self.root.display());

        let mut names = Vec::new();
        let walk = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in walk {
            if self.is_shutdown_requested() {
                return Err(ScanError::Interrupted);
            }

            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                ScanError::from_io(path, source)
            })?;

            if !entry.file_type().is_file() {
                log::trace!("Skipping non-file entry {}", entry.path().display());
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                log::warn!(
                    "Skipping file with non UTF-8 name: {}",
                    entry.path().display()
                );
                continue;
            };

            if self.skip_hidden && name.starts_with('.') {
                log::trace!("Skipping hidden file {}", name);
                continue;
            }

            names.push(name.to_string());
        }

        log::info!("Found {} files in {}", names.len(), self.root.display());
        Ok(names)
    }
}
