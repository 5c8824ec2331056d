//! File actions module.
//!
//! This module provides the filesystem side effects that follow a scan:
//! - Locating preview images for ROMs ([`images`])
//! - Deleting redundant ROMs and their images ([`delete`])
//!
//! # Deletion
//!
//! ```no_run
//! use romdupe::actions::delete::{delete_rom_with_images, DeleteConfig};
//! use std::path::Path;
//!
//! let result = delete_rom_with_images(
//!     Path::new("/roms"),
//!     Some(Path::new("/images")),
//!     "Game (Japan).sfc",
//!     &DeleteConfig::default(),
//! );
//! ```
//!
//! # Preview images
//!
//! ```no_run
//! use romdupe::actions::images::{find_preview_image, DEFAULT_IMAGE_EXTENSIONS};
//! use std::path::Path;
//!
//! let image = find_preview_image(Path::new("/images"), "Game (USA).sfc", DEFAULT_IMAGE_EXTENSIONS);
//! ```

pub mod delete;
pub mod images;

pub use delete::{
    delete_batch, delete_file, delete_rom_with_images, validate_preserves_copy,
    BatchDeleteResult, DeleteConfig, DeleteError, DeleteProgressCallback, DeleteResult,
};
pub use images::{find_preview_image, preview_for_group, DEFAULT_IMAGE_EXTENSIONS};
