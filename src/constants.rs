//! Global constants for wagon-upload.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Transport constants
/// Default SSH port
pub const SSH_DEFAULT_PORT: u16 = 22;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Buffer size for streaming files to the remote end (64KB)
pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

/// Repository protocols served by the SSH wagon
pub const SSH_PROTOCOLS: &[&str] = &["scp", "sftp", "ssh"];

/// Repository protocol served by the file wagon
pub const FILE_PROTOCOL: &str = "file";

/// Default repository id when none is configured
pub const DEFAULT_REPOSITORY_ID: &str = "default";

// Archive constants
/// Prefix of the temporary archive created for optimized uploads
pub const ARCHIVE_PREFIX: &str = "wagon";

/// Suffix of the temporary archive created for optimized uploads
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Chunk size for archive writes (512KB)
pub const COMPRESSION_CHUNK_SIZE: usize = 512 * 1024;

/// Deflate level for regular files
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 6;

/// Deflate level for files that are already compressed
pub const FAST_COMPRESSION_LEVEL: i32 = 1;

/// Extensions whose content is already compressed
pub const COMPRESSED_EXTENSIONS: &[&str] = &[
    "zip", "gz", "tgz", "bz2", "xz", "7z", "rar", "jar", "war", "ear",
    "jpg", "jpeg", "png", "gif", "webp", "mp3", "mp4", "woff", "woff2",
];

/// Archive extensions the zip archiver can produce
pub const ZIP_ARCHIVE_EXTENSIONS: &[&str] = &["zip", "jar", "war", "ear"];

// Fileset constants
/// Patterns dropped from every fileset unless default excludes are disabled.
/// Matched against the `/`-separated relative path.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    r"(^|/)\.git(/|$)",
    r"(^|/)\.gitignore$",
    r"(^|/)\.gitattributes$",
    r"(^|/)\.svn(/|$)",
    r"(^|/)CVS(/|$)",
    r"(^|/)\.cvsignore$",
    r"(^|/)\.hg(/|$)",
    r"(^|/)\.bzr(/|$)",
    r"(^|/)\.DS_Store$",
    r"~$",
    r"(^|/)#[^/]*#$",
    r"(^|/)\.#[^/]*$",
    r"(^|/)%[^/]*%$",
    r"(^|/)\._[^/]*$",
];
