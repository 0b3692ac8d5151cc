use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::env_vars::expand_env_vars;
use crate::constants::{DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_REPOSITORY_ID};
use crate::fileset::FileSet;
use crate::wagon::{AuthenticationInfo, Repository};

fn default_repository_id() -> String {
    DEFAULT_REPOSITORY_ID.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

/// Where to upload and how to authenticate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub private_key: Option<PathBuf>,
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            id: default_repository_id(),
            url: String::new(),
            username: None,
            password: None,
            private_key: None,
            passphrase: None,
        }
    }
}

impl RepositoryConfig {
    pub fn repository(&self) -> Result<Repository> {
        Repository::parse(&self.id, &self.url)
            .with_context(|| format!("Invalid repository url for {}", self.id))
    }

    pub fn authentication(&self) -> AuthenticationInfo {
        AuthenticationInfo {
            username: self.username.clone(),
            password: self.password.clone(),
            private_key: self.private_key.clone(),
            passphrase: self.passphrase.clone(),
        }
    }
}

/// A complete upload job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadConfig {
    #[serde(default)]
    pub repository: RepositoryConfig,
    pub fileset: FileSet,
    #[serde(default)]
    pub optimize: bool,
    #[serde(default = "default_timeout")]
    pub connection_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryConfig::default(),
            fileset: FileSet::new(""),
            optimize: false,
            connection_timeout_secs: default_timeout(),
        }
    }
}

impl UploadConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: UploadConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Expand `$VAR` and `${VAR}` in paths and credentials
    pub fn process_environment_variables(&mut self) {
        let expand_path = |path: &Path| PathBuf::from(expand_env_vars(&path.to_string_lossy()));
        let expand = |value: &mut Option<String>| {
            if let Some(v) = value.as_mut() {
                *v = expand_env_vars(v);
            }
        };

        self.repository.url = expand_env_vars(&self.repository.url);
        expand(&mut self.repository.username);
        expand(&mut self.repository.password);
        expand(&mut self.repository.passphrase);
        if let Some(key) = &self.repository.private_key {
            self.repository.private_key = Some(expand_path(key));
        }

        self.fileset.directory = expand_path(&self.fileset.directory);
        expand(&mut self.fileset.output_directory);
    }

    /// Reject configurations that cannot possibly upload anything
    pub fn validate(&self) -> Result<()> {
        if self.repository.url.trim().is_empty() {
            bail!("No repository url configured");
        }
        if self.fileset.directory.as_os_str().is_empty() {
            bail!("No fileset directory configured");
        }
        if self.connection_timeout_secs == 0 {
            bail!("Connection timeout must be greater than zero");
        }
        Ok(())
    }
}
