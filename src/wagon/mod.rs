//! Transport abstraction for moving files to a remote repository.
//!
//! A [`Wagon`] knows how to put a local file at a path relative to its
//! repository. Some wagons can also run shell commands on the remote end;
//! they expose that through [`Wagon::command_executor`] so callers can ask for
//! the capability instead of guessing from the concrete type.
//!
//! ## Supported Protocols
//!
//! - **scp / sftp / ssh**: [`ssh::SshWagon`], SFTP transfers plus remote exec
//! - **file**: [`file::FileWagon`], local copies, no remote exec
//!
//! ## Usage Example
//!
//! ```no_run
//! use wagon_upload::wagon::{open_wagon, AuthenticationInfo, Repository};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = Repository::parse("site", "scp://deploy@example.com/var/www/site")?;
//! let auth = AuthenticationInfo::default();
//!
//! let mut wagon = open_wagon(repository, &auth, 30)?;
//! wagon.put(Path::new("target/site/index.html"), "docs/index.html")?;
//! wagon.disconnect()?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

mod repository;

/// Local filesystem wagon
pub mod file;

/// SSH wagon (SFTP transfers and remote command execution)
pub mod ssh;

pub use repository::Repository;

use crate::constants::{FILE_PROTOCOL, SSH_PROTOCOLS};

/// Errors raised by wagons
#[derive(Debug, Error)]
pub enum WagonError {
    #[error("failed to connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("authentication failed for {username}@{host}")]
    Authentication { username: String, host: String },

    #[error("failed to transfer {local} to {destination}: {reason}")]
    Transfer {
        local: PathBuf,
        destination: String,
        reason: String,
    },

    #[error("remote command `{command}` exited with status {status}: {output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("invalid repository url {url}: {reason}")]
    InvalidRepository { url: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),
}

/// Credentials used when connecting a wagon
#[derive(Clone, Default)]
pub struct AuthenticationInfo {
    pub username: Option<String>,
    pub password: Option<String>,
    pub private_key: Option<PathBuf>,
    pub passphrase: Option<String>,
}

impl std::fmt::Debug for AuthenticationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationInfo")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("private_key", &self.private_key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Runs shell commands on the remote end of a wagon.
///
/// Commands execute in the repository base directory.
pub trait CommandExecutor {
    fn execute_command(&mut self, command: &str) -> Result<(), WagonError>;
}

/// A connected transport to a repository
pub trait Wagon {
    /// The repository this wagon is connected to
    fn repository(&self) -> &Repository;

    /// Transfer `source` to `destination`, relative to the repository base.
    /// Missing parent directories are created.
    fn put(&mut self, source: &Path, destination: &str) -> Result<(), WagonError>;

    /// Remote command execution, if this wagon supports it
    fn command_executor(&mut self) -> Option<&mut dyn CommandExecutor> {
        None
    }

    /// Close the connection
    fn disconnect(&mut self) -> Result<(), WagonError> {
        Ok(())
    }
}

/// Open a wagon for `repository`, choosing the implementation by protocol
pub fn open_wagon(
    repository: Repository,
    auth: &AuthenticationInfo,
    timeout_secs: u64,
) -> Result<Box<dyn Wagon>, WagonError> {
    let protocol = repository.protocol().to_string();
    debug!("Opening {} wagon for {}", protocol, repository);

    if SSH_PROTOCOLS.contains(&protocol.as_str()) {
        Ok(Box::new(ssh::SshWagon::connect(repository, auth, timeout_secs)?))
    } else if protocol == FILE_PROTOCOL {
        Ok(Box::new(file::FileWagon::new(repository)))
    } else {
        Err(WagonError::UnsupportedProtocol(protocol))
    }
}
