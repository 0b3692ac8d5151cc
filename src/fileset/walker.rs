use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::{Regex, RegexSet};
use walkdir::{DirEntry, WalkDir};

use super::{FileSet, FileSetError, FileSetResolver};
use crate::constants::DEFAULT_EXCLUDES;

lazy_static! {
    /// Version-control and editor noise dropped unless default excludes are off
    static ref DEFAULT_EXCLUDE_SET: RegexSet =
        RegexSet::new(DEFAULT_EXCLUDES).expect("default exclude patterns are valid");
}

/// Resolves filesets by walking the directory tree and matching
/// include/exclude regular expressions.
///
/// Entries are visited sorted by file name, so the resulting order is
/// stable across runs and platforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternResolver;

impl PatternResolver {
    pub fn new() -> Self {
        Self
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, FileSetError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| FileSetError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// `/`-separated form of `path` relative to `root`
fn normalized_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

fn is_default_excluded(root: &Path, entry: &DirEntry) -> bool {
    entry.depth() > 0
        && normalized_relative(root, entry.path())
            .map(|rel| DEFAULT_EXCLUDE_SET.is_match(&rel))
            .unwrap_or(false)
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

impl FileSetResolver for PatternResolver {
    fn included_files(&self, fileset: &FileSet) -> Result<Vec<String>, FileSetError> {
        let root = fileset.directory.as_path();
        if !root.is_dir() {
            return Err(FileSetError::MissingDirectory(root.to_path_buf()));
        }

        let includes = compile(&fileset.includes)?;
        let excludes = compile(&fileset.excludes)?;

        let walker = WalkDir::new(root)
            .follow_links(fileset.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(fileset.use_default_excludes && is_default_excluded(root, entry)));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !is_file(&entry) {
                continue;
            }

            let Some(normalized) = normalized_relative(root, entry.path()) else {
                continue;
            };

            if !includes.is_empty() && !includes.iter().any(|re| re.is_match(&normalized)) {
                trace!("Not included: {}", normalized);
                continue;
            }
            if excludes.iter().any(|re| re.is_match(&normalized)) {
                trace!("Excluded: {}", normalized);
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_string_lossy().into_owned());
            }
        }

        debug!("Resolved {} files in {}", files.len(), root.display());
        Ok(files)
    }
}
