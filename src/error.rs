//! Errors surfaced by the uploader.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::fileset::FileSetError;
use crate::wagon::WagonError;

/// Everything that can stop an upload.
///
/// An empty fileset is not an error: both upload modes log
/// "Nothing to upload." and return `Ok(())`.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Optimized upload requested on a wagon that cannot run remote commands
    #[error("wagon {protocol} does not support optimize upload")]
    UnsupportedCapability { protocol: String },

    #[error("failed to resolve fileset: {0}")]
    FileSet(#[from] FileSetError),

    #[error("failed to create temporary archive: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("failed to create archive: {0}")]
    ArchiveCreation(#[from] ArchiveError),

    #[error("transfer failed: {0}")]
    Transfer(#[source] WagonError),

    #[error("remote command failed: {0}")]
    RemoteCommand(#[source] WagonError),
}
