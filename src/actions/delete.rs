//! ROM and preview-image deletion.
//!
//! # Overview
//!
//! This module removes the redundant members of duplicate groups:
//! - Permanent removal (default, like a plain `rm`)
//! - Move to system trash (recoverable, opt-in)
//! - Companion preview images removed alongside each ROM
//! - Batch operations with progress reporting and Ctrl+C support
//!
//! # Safety
//!
//! Callers build the deletion list from a [`crate::duplicates::KeepSelection`],
//! which always leaves one file per group. [`validate_preserves_copy`] can
//! double-check a list against a group before anything is removed.
//!
//! # Example
//!
//! ```no_run
//! use romdupe::actions::delete::{delete_rom_with_images, DeleteConfig};
//! use std::path::Path;
//!
//! let result = delete_rom_with_images(
//!     Path::new("/roms"),
//!     Some(Path::new("/images")),
//!     "Super Game (Europe).sfc",
//!     &DeleteConfig::default(),
//! );
//! match result {
//!     Ok(r) => println!("Deleted {} ({} images)", r.path.display(), r.images.len()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::images::{image_candidates, DEFAULT_IMAGE_EXTENSIONS};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// Attempted to delete all copies (at least one must be preserved).
    #[error("cannot delete all copies - at least one file must be preserved")]
    AllCopiesWouldBeDeleted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::AllCopiesWouldBeDeleted => None,
        }
    }

    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Result of deleting one ROM and its images.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// ROM path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted ROM in bytes.
    pub size: u64,
    /// Preview images deleted alongside the ROM.
    pub images: Vec<PathBuf>,
    /// Preview images that exist but could not be removed, with the error.
    pub image_failures: Vec<(String, String)>,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

/// Results of a batch deletion operation.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted ROMs.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(String, String)>,
    /// Total ROM bytes freed.
    pub bytes_freed: u64,
    /// Whether the batch stopped early on a shutdown request.
    pub interrupted: bool,
}

impl BatchDeleteResult {
    /// Number of deleted ROMs.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of preview images deleted.
    #[must_use]
    pub fn images_deleted(&self) -> usize {
        self.successes.iter().map(|s| s.images.len()).sum()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "Deletion complete. {} ROM files deleted ({} images, {} freed).",
            self.success_count(),
            self.images_deleted(),
            bytesize::ByteSize::b(self.bytes_freed)
        );
        if !self.failures.is_empty() {
            msg.push_str(&format!(" {} errors occurred.", self.failure_count()));
        }
        if self.interrupted {
            msg.push_str(" Interrupted before all files were processed.");
        }
        msg
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Remove files permanently instead of moving them to the trash.
    pub permanent: bool,
    /// Continue on error (process remaining files even if some fail).
    pub continue_on_error: bool,
    /// Image extensions tried when removing previews.
    pub image_extensions: Vec<String>,
    /// Optional shutdown flag checked between files.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            permanent: true,
            continue_on_error: true,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            shutdown_flag: None,
        }
    }
}

impl DeleteConfig {
    /// Set permanent or trash deletion.
    #[must_use]
    pub fn with_permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    /// Set the image extensions.
    #[must_use]
    pub fn with_image_extensions(mut self, extensions: Vec<String>) -> Self {
        self.image_extensions = extensions;
        self
    }

    /// Enable/disable continue on error.
    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Set the shutdown flag.
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
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, filename: &str, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, filename: &str, result: &DeleteResult);

    /// Called after failed deletion.
    fn on_delete_failure(&self, filename: &str, error: &str);

    /// Called when batch operation completes.
    fn on_complete(&self, result: &BatchDeleteResult);
}

/// Remove one file, returning its size.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if metadata can't be read
/// - `TrashFailed` / `PermanentDeleteFailed` if removal fails
pub fn delete_file(path: &Path, permanent: bool) -> Result<u64, DeleteError> {
    let size = fs::symlink_metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    if permanent {
        fs::remove_file(path).map_err(|e| {
            log::error!("Permanent delete failed for {}: {}", path.display(), e);
            DeleteError::PermanentDeleteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        log::info!("Deleted: {} ({} bytes)", path.display(), size);
    } else {
        trash::delete(path).map_err(|e| {
            log::error!("Trash operation failed for {}: {}", path.display(), e);
            DeleteError::TrashFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    }

    Ok(size)
}

/// Delete a ROM and every preview image named after it.
///
/// The ROM is removed first. Missing images are ignored. Any other image
/// failure is recorded in [`DeleteResult::image_failures`] and the remaining
/// candidates are still tried.
///
/// # Errors
///
/// Returns a [`DeleteError`] only if the ROM itself could not be removed.
pub fn delete_rom_with_images(
    rom_dir: &Path,
    image_dir: Option<&Path>,
    filename: &str,
    config: &DeleteConfig,
) -> Result<DeleteResult, DeleteError> {
    let rom_path = rom_dir.join(filename);
    let size = delete_file(&rom_path, config.permanent)?;

    let mut images = Vec::new();
    let mut image_failures = Vec::new();
    if let Some(image_dir) = image_dir {
        for candidate in image_candidates(filename, &config.image_extensions) {
            let image_path = image_dir.join(&candidate);
            match delete_file(&image_path, config.permanent) {
                Ok(_) => images.push(image_path),
                Err(DeleteError::NotFound(_)) => {}
                Err(e) => {
                    log::error!("Error deleting image {}: {}", image_path.display(), e);
                    image_failures.push((candidate, e.to_string()));
                }
            }
        }
    }

    Ok(DeleteResult {
        path: rom_path,
        size,
        images,
        image_failures,
        permanent: config.permanent,
    })
}

/// Delete multiple ROMs (and their images) in order.
///
/// Stops early if the shutdown flag is set, or on the first error when
/// `continue_on_error` is false.
pub fn delete_batch<C: DeleteProgressCallback + ?Sized>(
    rom_dir: &Path,
    image_dir: Option<&Path>,
    filenames: &[String],
    config: &DeleteConfig,
    callback: Option<&C>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();
    let total = filenames.len();

    for (index, filename) in filenames.iter().enumerate() {
        if config.is_shutdown_requested() {
            log::warn!("Deletion interrupted after {} of {} files", index, total);
            result.interrupted = true;
            break;
        }

        if let Some(cb) = callback {
            cb.on_before_delete(filename, index, total);
        }

        match delete_rom_with_images(rom_dir, image_dir, filename, config) {
            Ok(del) => {
                result.bytes_freed += del.size;
                if let Some(cb) = callback {
                    cb.on_delete_success(filename, &del);
                    for (image, error) in &del.image_failures {
                        cb.on_delete_failure(image, error);
                    }
                }
                result.failures.extend(del.image_failures.iter().cloned());
                let image_failed = !del.image_failures.is_empty();
                result.successes.push(del);

                if image_failed && !config.continue_on_error {
                    log::info!("Stopping batch deletion due to error (continue_on_error=false)");
                    break;
                }
            }
            Err(e) => {
                let error_msg = e.to_string();
                log::error!("Error deleting {}: {}", filename, error_msg);

                if let Some(cb) = callback {
                    cb.on_delete_failure(filename, &error_msg);
                }

                result.failures.push((filename.clone(), error_msg));

                if !config.continue_on_error {
                    log::info!("Stopping batch deletion due to error (continue_on_error=false)");
                    break;
                }
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    result
}

/// Validate that a selection doesn't delete all copies of a group.
///
/// # Errors
///
/// Returns `AllCopiesWouldBeDeleted` if every group member is selected.
///
/// # Example
///
/// ```
/// use romdupe::actions::delete::validate_preserves_copy;
///
/// let group = vec!["A (Europe).rom".to_string(), "A (USA).rom".to_string()];
///
/// assert!(validate_preserves_copy(&group[1..], &group).is_ok());
/// assert!(validate_preserves_copy(&group, &group).is_err());
/// ```
pub fn validate_preserves_copy(selected: &[String], group: &[String]) -> Result<(), DeleteError> {
    let selected_set: HashSet<&String> = selected.iter().collect();
    let preserved_count = group.iter().filter(|f| !selected_set.contains(f)).count();

    if preserved_count == 0 {
        log::error!(
            "Attempted to delete all {} copies of a duplicate group",
            group.len()
        );
        Err(DeleteError::AllCopiesWouldBeDeleted)
    } else {
        Ok(())
    }
}
