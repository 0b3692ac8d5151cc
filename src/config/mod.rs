//! Upload job configuration.
//!
//! Jobs are described in YAML and may reference environment variables so
//! secrets stay out of the file:
//!
//! ```yaml
//! repository:
//!   id: site
//!   url: scp://deploy@example.com/var/www/site
//!   private_key: ${HOME}/.ssh/id_ed25519
//! fileset:
//!   directory: target/site
//!   output_directory: docs
//! optimize: true
//! ```

mod env_vars;
mod upload_config;

pub use env_vars::expand_env_vars;

pub use upload_config::{RepositoryConfig, UploadConfig};
