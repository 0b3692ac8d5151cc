//! Test utilities for wagon-upload
//!
//! This module provides a recording wagon, a fixed fileset resolver and
//! filesystem fixtures shared by the unit tests.

#![cfg(test)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::fileset::{FileSet, FileSetError, FileSetResolver};
use crate::wagon::{CommandExecutor, Repository, Wagon, WagonError};

/// Creates a source tree with `a.txt` and `sub/b.txt`
pub fn create_source_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.txt"), b"Test content a").unwrap();
    fs::write(dir.path().join("sub").join("b.txt"), b"Test content b").unwrap();
    dir
}

/// Resolver returning a fixed list, in the given order
pub struct FixedResolver {
    files: Vec<String>,
}

impl FixedResolver {
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self { files: Vec::new() }
    }
}

impl FileSetResolver for FixedResolver {
    fn included_files(&self, _fileset: &FileSet) -> Result<Vec<String>, FileSetError> {
        Ok(self.files.clone())
    }
}

/// One interaction with a [`RecordingWagon`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put {
        source: PathBuf,
        destination: String,
        source_existed: bool,
    },
    Command(String),
}

/// Wagon that records every call instead of talking to a server
pub struct RecordingWagon {
    repository: Repository,
    supports_commands: bool,
    pub calls: Vec<Call>,
    /// Fail the put whose destination equals this
    pub fail_put_to: Option<String>,
    pub fail_all_puts: bool,
    /// Fail commands with any of these prefixes
    pub fail_commands_starting_with: Vec<String>,
    /// Copy each put source so tests can inspect it after the upload
    pub keep_put_copies: bool,
    pub copies: HashMap<String, PathBuf>,
    copy_dir: Option<TempDir>,
}

impl RecordingWagon {
    fn new(supports_commands: bool) -> Self {
        Self {
            repository: Repository::parse("test", "scp://deploy@example.com/srv/site").unwrap(),
            supports_commands,
            calls: Vec::new(),
            fail_put_to: None,
            fail_all_puts: false,
            fail_commands_starting_with: Vec::new(),
            keep_put_copies: false,
            copies: HashMap::new(),
            copy_dir: None,
        }
    }

    pub fn with_commands() -> Self {
        Self::new(true)
    }

    pub fn without_commands() -> Self {
        Self::new(false)
    }

    pub fn put_destinations(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Put { destination, .. } => Some(destination.clone()),
                Call::Command(_) => None,
            })
            .collect()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Command(command) => Some(command.clone()),
                Call::Put { .. } => None,
            })
            .collect()
    }

    fn keep_copy(&mut self, source: &Path, destination: &str) {
        let dir = self.copy_dir.get_or_insert_with(|| TempDir::new().unwrap());
        let copy = dir.path().join(format!("copy-{}", self.copies.len()));
        fs::copy(source, &copy).unwrap();
        self.copies.insert(destination.to_string(), copy);
    }
}

impl Wagon for RecordingWagon {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    fn put(&mut self, source: &Path, destination: &str) -> Result<(), WagonError> {
        self.calls.push(Call::Put {
            source: source.to_path_buf(),
            destination: destination.to_string(),
            source_existed: source.exists(),
        });

        if self.fail_all_puts || self.fail_put_to.as_deref() == Some(destination) {
            return Err(WagonError::Transfer {
                local: source.to_path_buf(),
                destination: destination.to_string(),
                reason: "connection reset".to_string(),
            });
        }

        if self.keep_put_copies {
            self.keep_copy(source, destination);
        }
        Ok(())
    }

    fn command_executor(&mut self) -> Option<&mut dyn CommandExecutor> {
        if self.supports_commands {
            Some(self)
        } else {
            None
        }
    }
}

impl CommandExecutor for RecordingWagon {
    fn execute_command(&mut self, command: &str) -> Result<(), WagonError> {
        self.calls.push(Call::Command(command.to_string()));

        if self
            .fail_commands_starting_with
            .iter()
            .any(|prefix| command.starts_with(prefix.as_str()))
        {
            return Err(WagonError::CommandFailed {
                command: command.to_string(),
                status: 1,
                output: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}
