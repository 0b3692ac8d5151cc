//! Archive creation for optimized uploads.
//!
//! An [`Archiver`] packs a list of files, given relative to a base
//! directory, into a single archive at a destination path. Entry names are
//! the relative paths with `/` separators.

use std::path::{Path, PathBuf};

use thiserror::Error;

mod zip_archiver;

pub use zip_archiver::ZipArchiver;

use crate::constants::ZIP_ARCHIVE_EXTENSIONS;

/// Errors raised while creating an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no archiver available for {0}")]
    NoSuchArchiver(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write archive {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Packs files into an archive
#[cfg_attr(test, mockall::automock)]
pub trait Archiver {
    fn create_archive(
        &self,
        base_dir: &Path,
        files: &[String],
        destination: &Path,
    ) -> Result<(), ArchiveError>;
}

/// Pick an archiver from the destination's extension
pub fn archiver_for(destination: &Path) -> Result<Box<dyn Archiver>, ArchiveError> {
    let extension = destination
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if ZIP_ARCHIVE_EXTENSIONS.contains(&ext.as_str()) => Ok(Box::new(ZipArchiver::new())),
        _ => Err(ArchiveError::NoSuchArchiver(destination.to_path_buf())),
    }
}

/// Archiver that delegates to [`archiver_for`] the destination.
///
/// An unknown extension fails with [`ArchiveError::NoSuchArchiver`] before
/// anything is written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionArchiver;

impl ExtensionArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ExtensionArchiver {
    fn create_archive(
        &self,
        base_dir: &Path,
        files: &[String],
        destination: &Path,
    ) -> Result<(), ArchiveError> {
        archiver_for(destination)?.create_archive(base_dir, files, destination)
    }
}
