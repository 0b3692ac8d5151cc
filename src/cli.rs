use clap::Parser;
use std::path::PathBuf;

use crate::config::UploadConfig;

/// Command-line arguments for wagon-upload.
///
/// Every option overrides the matching value from `--config` when both are
/// given.
#[derive(Parser, Debug, Default)]
#[clap(name = "wagon-upload", about = "Upload a fileset to a remote repository")]
pub struct Args {
    /// Path to a YAML upload configuration
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Repository URL (scp://, sftp://, ssh:// or file://)
    #[clap(short, long)]
    pub url: Option<String>,

    /// Repository id used in log output
    #[clap(long)]
    pub repository_id: Option<String>,

    /// Local directory holding the files to upload
    #[clap(short, long)]
    pub directory: Option<PathBuf>,

    /// Remote directory, relative to the repository, to upload into
    #[clap(short, long)]
    pub output_directory: Option<String>,

    /// Include regex matched against `/`-separated relative paths (repeatable)
    #[clap(short, long)]
    pub include: Vec<String>,

    /// Exclude regex matched against `/`-separated relative paths (repeatable)
    #[clap(short, long)]
    pub exclude: Vec<String>,

    /// Keep version-control and editor files
    #[clap(long)]
    pub no_default_excludes: bool,

    /// Zip the files, upload once and unzip on the remote end
    #[clap(long)]
    pub optimize: bool,

    /// SSH username
    #[clap(long)]
    pub user: Option<String>,

    /// Path to private key file for SSH authentication
    #[clap(short, long)]
    pub key: Option<PathBuf>,

    /// Connection timeout in seconds
    #[clap(long)]
    pub timeout: Option<u64>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of `config`
    pub fn apply_to(&self, config: &mut UploadConfig) {
        if let Some(url) = &self.url {
            config.repository.url = url.clone();
        }
        if let Some(id) = &self.repository_id {
            config.repository.id = id.clone();
        }
        if let Some(directory) = &self.directory {
            config.fileset.directory = directory.clone();
        }
        if let Some(output_directory) = &self.output_directory {
            config.fileset.output_directory = Some(output_directory.clone());
        }
        if !self.include.is_empty() {
            config.fileset.includes = self.include.clone();
        }
        if !self.exclude.is_empty() {
            config.fileset.excludes = self.exclude.clone();
        }
        if self.no_default_excludes {
            config.fileset.use_default_excludes = false;
        }
        if self.optimize {
            config.optimize = true;
        }
        if let Some(user) = &self.user {
            config.repository.username = Some(user.clone());
        }
        if let Some(key) = &self.key {
            config.repository.private_key = Some(key.clone());
        }
        if let Some(timeout) = self.timeout {
            config.connection_timeout_secs = timeout;
        }
    }
}
