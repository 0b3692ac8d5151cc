//! Filesets: a base directory plus rules selecting the files to upload.
//!
//! A [`FileSetResolver`] turns a [`FileSet`] into an ordered list of paths
//! relative to the fileset directory. The uploader never reorders that list.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod walker;

pub use walker::PatternResolver;

/// Errors raised while resolving a fileset
#[derive(Debug, Error)]
pub enum FileSetError {
    #[error("fileset directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to walk fileset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

fn default_true() -> bool {
    true
}

/// A directory and the rules selecting files below it.
///
/// `includes` and `excludes` are regular expressions matched against the
/// `/`-separated path relative to `directory`. No includes means everything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileSet {
    pub directory: PathBuf,
    #[serde(default)]
    pub output_directory: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default = "default_true")]
    pub use_default_excludes: bool,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl FileSet {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            output_directory: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            use_default_excludes: true,
            follow_symlinks: false,
        }
    }

    pub fn with_output_directory(mut self, output_directory: impl Into<String>) -> Self {
        self.output_directory = Some(output_directory.into());
        self
    }

    /// The remote directory files go to, or `None` when unset or blank
    pub fn output_directory(&self) -> Option<&str> {
        self.output_directory
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
    }
}

impl fmt::Display for FileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directory.display())?;
        if let Some(output) = self.output_directory() {
            write!(f, " -> {}", output)?;
        }
        if !self.includes.is_empty() {
            write!(f, " includes {:?}", self.includes)?;
        }
        if !self.excludes.is_empty() {
            write!(f, " excludes {:?}", self.excludes)?;
        }
        Ok(())
    }
}

/// Resolves a fileset into relative file paths
pub trait FileSetResolver {
    fn included_files(&self, fileset: &FileSet) -> Result<Vec<String>, FileSetError>;
}
