use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{Repository, Wagon, WagonError};

/// Wagon for `file://` repositories.
///
/// Copies files below the repository base directory. It cannot run remote
/// commands, so optimized uploads are refused for it.
pub struct FileWagon {
    repository: Repository,
    base_dir: PathBuf,
}

impl FileWagon {
    pub fn new(repository: Repository) -> Self {
        let base_dir = PathBuf::from(repository.base_dir());
        Self {
            repository,
            base_dir,
        }
    }

    /// Local path a repository-relative destination maps to
    pub fn resolve(&self, destination: &str) -> PathBuf {
        destination
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.base_dir.clone(), |path, segment| path.join(segment))
    }
}

impl Wagon for FileWagon {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    fn put(&mut self, source: &Path, destination: &str) -> Result<(), WagonError> {
        let target = self.resolve(destination);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| WagonError::Transfer {
                local: source.to_path_buf(),
                destination: destination.to_string(),
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }

        let bytes = fs::copy(source, &target).map_err(|e| WagonError::Transfer {
            local: source.to_path_buf(),
            destination: destination.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Copied {} ({} bytes) to {}", source.display(), bytes, target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_wagon(base: &Path) -> FileWagon {
        let url = format!("file://{}", base.display());
        FileWagon::new(Repository::parse("local", &url).unwrap())
    }

    #[test]
    fn test_put_creates_parent_directories() {
        let source_dir = TempDir::new().unwrap();
        let repo_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("b.txt");
        fs::write(&source, "content b").unwrap();

        let mut wagon = file_wagon(repo_dir.path());
        wagon.put(&source, "releases/sub/b.txt").unwrap();

        let copied = repo_dir.path().join("releases").join("sub").join("b.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), "content b");
    }

    #[test]
    fn test_put_into_base_dir_with_space() {
        let source_dir = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let source = source_dir.path().join("a.txt");
        fs::write(&source, "content a").unwrap();

        let mut wagon = file_wagon(&parent.path().join("my repo"));
        wagon.put(&source, "a.txt").unwrap();

        let copied = parent.path().join("my repo").join("a.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), "content a");
        assert!(!parent.path().join("my%20repo").exists());
    }

    #[test]
    fn test_put_missing_source_fails_with_transfer_error() {
        let repo_dir = TempDir::new().unwrap();
        let mut wagon = file_wagon(repo_dir.path());

        let result = wagon.put(Path::new("/definitely/not/here.txt"), "here.txt");
        match result {
            Err(WagonError::Transfer { destination, .. }) => assert_eq!(destination, "here.txt"),
            other => panic!("expected transfer error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_wagon_refuses_command_execution() {
        let repo_dir = TempDir::new().unwrap();
        let mut wagon = file_wagon(repo_dir.path());
        assert!(wagon.command_executor().is_none());
    }
}
