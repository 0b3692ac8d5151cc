use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::time::Instant;

use log::debug;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use super::{ArchiveError, Archiver};
use crate::constants::{
    COMPRESSED_EXTENSIONS, COMPRESSION_CHUNK_SIZE, DEFAULT_COMPRESSION_LEVEL,
    FAST_COMPRESSION_LEVEL,
};

/// Writes deflated zip archives
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

/// Determine compression options based on file type.
///
/// Files that are already compressed (archives, images, media) use the
/// fastest deflate level since a higher one gains nothing.
pub fn get_compression_options(path: &Path) -> FileOptions {
    let already_compressed = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| COMPRESSED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    let level = if already_compressed {
        FAST_COMPRESSION_LEVEL
    } else {
        DEFAULT_COMPRESSION_LEVEL
    };

    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level))
        .unix_permissions(0o644)
}

/// Zip entry name for a relative path
fn entry_name(relative: &str) -> String {
    relative.replace('\\', "/")
}

impl Archiver for ZipArchiver {
    fn create_archive(
        &self,
        base_dir: &Path,
        files: &[String],
        destination: &Path,
    ) -> Result<(), ArchiveError> {
        let start = Instant::now();
        let write_error = |source: zip::result::ZipError| ArchiveError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let archive = fs::File::create(destination)?;
        let mut zip = ZipWriter::new(archive);
        let mut buffer = vec![0u8; COMPRESSION_CHUNK_SIZE];

        for file in files {
            let source = base_dir.join(file);
            let read_error = |e: std::io::Error| ArchiveError::Read {
                path: source.clone(),
                source: e,
            };

            let input = fs::File::open(&source).map_err(read_error)?;
            let mut reader = BufReader::new(input);

            zip.start_file(entry_name(file), get_compression_options(&source))
                .map_err(write_error)?;

            loop {
                let read = reader.read(&mut buffer).map_err(read_error)?;
                if read == 0 {
                    break;
                }
                zip.write_all(&buffer[..read])?;
            }
        }

        zip.finish().map_err(write_error)?;

        debug!(
            "Archived {} files into {} in {:?}",
            files.len(),
            destination.display(),
            start.elapsed()
        );
        Ok(())
    }
}
