//! Fileset uploads over a wagon.
//!
//! Two modes are offered:
//!
//! - **Direct**: every resolved file is put one by one, in resolver order.
//! - **Optimized**: the files are zipped into a temporary archive, the
//!   archive is put once, unpacked remotely with `unzip`, and the remote
//!   archive is removed with `rm -f`. The wagon must expose a
//!   [`CommandExecutor`](crate::wagon::CommandExecutor).
//!
//! ```text
//! capability check -> resolve -> archive -> put -> unzip -> rm -f -> done
//!                                                   |        ^
//!                                                   +--fail--+
//! ```
//!
//! The local temporary archive is deleted on every exit path.
//!
//! ## Usage Example
//!
//! ```no_run
//! use wagon_upload::fileset::FileSet;
//! use wagon_upload::upload::{DefaultWagonUpload, WagonUpload};
//! use wagon_upload::wagon::{open_wagon, AuthenticationInfo, Repository};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = Repository::parse("site", "scp://deploy@example.com/var/www/site")?;
//! let mut wagon = open_wagon(repository, &AuthenticationInfo::default(), 30)?;
//!
//! let fileset = FileSet::new("target/site").with_output_directory("docs");
//! DefaultWagonUpload::default().upload_with(wagon.as_mut(), &fileset, true)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use log::{info, warn};

mod remote;

pub use remote::{cleanup_command, remote_path, settle, unpack_command, RemoteArchive};

use crate::archive::{Archiver, ExtensionArchiver};
use crate::constants::{ARCHIVE_PREFIX, ARCHIVE_SUFFIX};
use crate::error::UploadError;
use crate::fileset::{FileSet, FileSetResolver, PatternResolver};
use crate::wagon::Wagon;

/// Uploads filesets to a wagon
pub trait WagonUpload {
    /// Put every included file, in resolver order
    fn upload(&self, wagon: &mut dyn Wagon, fileset: &FileSet) -> Result<(), UploadError>;

    /// Optimized upload when `optimize` is set, direct upload otherwise
    fn upload_with(
        &self,
        wagon: &mut dyn Wagon,
        fileset: &FileSet,
        optimize: bool,
    ) -> Result<(), UploadError>;
}

/// Uploader backed by an [`Archiver`] and a [`FileSetResolver`]
#[derive(Debug, Clone)]
pub struct DefaultWagonUpload<A = ExtensionArchiver, R = PatternResolver> {
    archiver: A,
    resolver: R,
}

impl Default for DefaultWagonUpload<ExtensionArchiver, PatternResolver> {
    fn default() -> Self {
        Self::new(ExtensionArchiver::new(), PatternResolver::new())
    }
}

impl<A: Archiver, R: FileSetResolver> DefaultWagonUpload<A, R> {
    pub fn new(archiver: A, resolver: R) -> Self {
        Self { archiver, resolver }
    }

    /// Archive, put, unpack and remove. `archive` is owned by the caller.
    fn transfer_archive(
        &self,
        wagon: &mut dyn Wagon,
        fileset: &FileSet,
        files: &[String],
        archive: &Path,
    ) -> Result<(), UploadError> {
        info!("Creating {} ...", archive.display());
        self.archiver
            .create_archive(&fileset.directory, files, archive)?;

        let archive_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let remote_dir = fileset.output_directory();
        let remote_file = remote_path(remote_dir, &archive_name);

        info!(
            "Uploading {} to {}/{} ...",
            archive.display(),
            wagon.repository().url(),
            remote_file
        );
        wagon
            .put(archive, &remote_file)
            .map_err(UploadError::Transfer)?;

        let protocol = wagon.repository().protocol().to_string();
        let executor = wagon
            .command_executor()
            .ok_or(UploadError::UnsupportedCapability { protocol })?;

        RemoteArchive::new(remote_dir, remote_file).unpack(executor)
    }
}

impl<A: Archiver, R: FileSetResolver> WagonUpload for DefaultWagonUpload<A, R> {
    fn upload(&self, wagon: &mut dyn Wagon, fileset: &FileSet) -> Result<(), UploadError> {
        let files = self.resolver.included_files(fileset)?;

        if files.is_empty() {
            info!("Nothing to upload.");
            return Ok(());
        }

        let url = wagon.repository().url().to_string();
        let output_directory = fileset.output_directory();

        for file in &files {
            let destination = remote_path(output_directory, file);
            let source = fileset.directory.join(file);

            info!("Uploading {} to {}/{} ...", source.display(), url, destination);
            wagon
                .put(&source, &destination)
                .map_err(UploadError::Transfer)?;
        }

        Ok(())
    }

    fn upload_with(
        &self,
        wagon: &mut dyn Wagon,
        fileset: &FileSet,
        optimize: bool,
    ) -> Result<(), UploadError> {
        if !optimize {
            return self.upload(wagon, fileset);
        }

        if wagon.command_executor().is_none() {
            return Err(UploadError::UnsupportedCapability {
                protocol: wagon.repository().protocol().to_string(),
            });
        }

        info!("Uploading {}", fileset);

        let files = self.resolver.included_files(fileset)?;
        if files.is_empty() {
            info!("Nothing to upload.");
            return Ok(());
        }

        let archive = tempfile::Builder::new()
            .prefix(ARCHIVE_PREFIX)
            .suffix(ARCHIVE_SUFFIX)
            .tempfile()
            .map_err(UploadError::TempFile)?
            .into_temp_path();

        let result = self.transfer_archive(wagon, fileset, &files, &archive);

        let local = archive.to_path_buf();
        if let Err(e) = archive.close() {
            warn!("Failed to delete temporary archive {}: {}", local.display(), e);
        }

        result
    }
}
