//! # wagon-upload
//!
//! Upload a fileset to a remote repository through a pluggable transport
//! (a "wagon"), either file by file or as a single zip archive that is
//! unpacked on the remote end.
//!
//! ## Overview
//!
//! A fileset is a local directory plus include/exclude rules. Direct mode
//! puts every matching file in order. Optimized mode trades the per-file
//! round trips for one archive transfer followed by `unzip` and `rm -f` on
//! the remote side, which needs a wagon that can run commands (SSH).
//!
//! ## Usage
//!
//! ```no_run
//! use wagon_upload::fileset::FileSet;
//! use wagon_upload::upload::{DefaultWagonUpload, WagonUpload};
//! use wagon_upload::wagon::{file::FileWagon, Repository};
//!
//! # fn main() -> anyhow::Result<()> {
//! let repository = Repository::parse("local", "file:///srv/www")?;
//! let mut wagon = FileWagon::new(repository);
//!
//! let fileset = FileSet::new("target/site").with_output_directory("docs");
//! DefaultWagonUpload::default().upload(&mut wagon, &fileset)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`upload`]: direct and optimized fileset uploads
//! - [`wagon`]: transport abstraction, SSH and file wagons
//! - [`archive`]: archive creation for optimized uploads
//! - [`fileset`]: fileset model and resolution
//! - [`config`]: YAML job configuration
//! - [`error`]: upload error kinds
//! - [`cli`]: command-line interface definitions
//! - [`constants`]: application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Upload job configuration
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Upload error kinds
pub mod error;

/// Archive creation for optimized uploads
pub mod archive;

/// Fileset model and resolution
pub mod fileset;

/// Transport abstraction and implementations
pub mod wagon;

/// Direct and optimized fileset uploads
pub mod upload;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;

pub use error::UploadError;
