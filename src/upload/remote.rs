use log::{info, warn};

use crate::error::UploadError;
use crate::wagon::{CommandExecutor, WagonError};

fn normalized_dir(output_directory: Option<&str>) -> Option<&str> {
    output_directory
        .map(|dir| dir.trim().trim_end_matches('/'))
        .filter(|dir| !dir.is_empty())
}

/// Remote path for a file relative to the fileset directory.
///
/// Backslashes become `/`. A blank output directory adds no prefix.
pub fn remote_path(output_directory: Option<&str>, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    match normalized_dir(output_directory) {
        Some(dir) => format!("{}/{}", dir, relative),
        None => relative,
    }
}

/// Unpack `remote_file` over whatever is already there.
///
/// `-qq` keeps unzip silent; a chatty exec channel can stall some SSH
/// servers when thousands of entries are listed.
pub fn unpack_command(remote_dir: Option<&str>, remote_file: &str) -> String {
    match normalized_dir(remote_dir) {
        Some(dir) => format!("unzip -o -qq -d {} {}", dir, remote_file),
        None => format!("unzip -o -qq {}", remote_file),
    }
}

pub fn cleanup_command(remote_file: &str) -> String {
    format!("rm -f {}", remote_file)
}

/// Pick the error to report once both remote commands have run.
///
/// The cleanup error wins when both fail.
// TODO: consider reporting the unpack error as the primary cause.
pub fn settle(
    unpacked: Result<(), WagonError>,
    removed: Result<(), WagonError>,
) -> Result<(), UploadError> {
    match (unpacked, removed) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(unpack), Ok(())) => Err(UploadError::RemoteCommand(unpack)),
        (Ok(()), Err(cleanup)) => Err(UploadError::RemoteCommand(cleanup)),
        (Err(unpack), Err(cleanup)) => {
            warn!("Remote unpack failed before cleanup also failed: {}", unpack);
            Err(UploadError::RemoteCommand(cleanup))
        }
    }
}

/// An archive uploaded to the remote end.
///
/// Unpacking consumes it; the remote file is removed whether or not the
/// unpack succeeded.
#[derive(Debug)]
pub struct RemoteArchive<'a> {
    remote_dir: Option<&'a str>,
    remote_file: String,
}

impl<'a> RemoteArchive<'a> {
    pub fn new(remote_dir: Option<&'a str>, remote_file: String) -> Self {
        Self {
            remote_dir,
            remote_file,
        }
    }

    pub fn unpack(self, executor: &mut dyn CommandExecutor) -> Result<(), UploadError> {
        let command = unpack_command(self.remote_dir, &self.remote_file);
        info!("Remote: {}", command);
        let unpacked = executor.execute_command(&command);

        let command = cleanup_command(&self.remote_file);
        info!("Remote: {}", command);
        let removed = executor.execute_command(&command);

        settle(unpacked, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn command_failed(command: &str) -> WagonError {
        WagonError::CommandFailed {
            command: command.to_string(),
            status: 1,
            output: String::new(),
        }
    }

    fn failed_command(result: Result<(), UploadError>) -> String {
        match result {
            Err(UploadError::RemoteCommand(WagonError::CommandFailed { command, .. })) => command,
            other => panic!("expected remote command failure, got {:?}", other),
        }
    }

    #[test]
    fn test_remote_path_with_output_directory() {
        assert_eq!(remote_path(Some("releases"), "a.txt"), "releases/a.txt");
        assert_eq!(remote_path(Some("releases"), "sub/b.txt"), "releases/sub/b.txt");
        assert_eq!(remote_path(Some("releases/"), "a.txt"), "releases/a.txt");
    }

    #[test]
    fn test_remote_path_blank_output_directory() {
        assert_eq!(remote_path(None, "sub\\b.txt"), "sub/b.txt");
        assert_eq!(remote_path(Some(""), "a.txt"), "a.txt");
        assert_eq!(remote_path(Some("   "), "a.txt"), "a.txt");
    }

    #[test]
    fn test_unpack_command_shapes() {
        assert_eq!(
            unpack_command(Some("releases"), "releases/wagon123.zip"),
            "unzip -o -qq -d releases releases/wagon123.zip"
        );
        assert_eq!(unpack_command(None, "wagon123.zip"), "unzip -o -qq wagon123.zip");
        assert_eq!(unpack_command(Some(" "), "wagon123.zip"), "unzip -o -qq wagon123.zip");
    }

    #[test]
    fn test_cleanup_command_shape() {
        assert_eq!(cleanup_command("releases/wagon123.zip"), "rm -f releases/wagon123.zip");
    }

    #[test]
    fn test_settle_success() {
        assert!(settle(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_settle_reports_unpack_failure_when_cleanup_succeeds() {
        let result = settle(Err(command_failed("unzip")), Ok(()));
        assert_eq!(failed_command(result), "unzip");
    }

    #[test]
    fn test_settle_reports_cleanup_failure() {
        let result = settle(Ok(()), Err(command_failed("rm")));
        assert_eq!(failed_command(result), "rm");
    }

    #[test]
    fn test_settle_cleanup_failure_takes_precedence() {
        let result = settle(Err(command_failed("unzip")), Err(command_failed("rm")));
        assert_eq!(failed_command(result), "rm");
    }

    proptest! {
        #[test]
        fn prop_separator_style_does_not_change_remote_path(
            segments in prop::collection::vec("[a-zA-Z0-9_.-]{1,8}", 1..5),
            output in prop::option::of("[a-z]{1,8}"),
        ) {
            let forward = segments.join("/");
            let backward = segments.join("\\");

            let expected = remote_path(output.as_deref(), &forward);
            prop_assert_eq!(remote_path(output.as_deref(), &backward), expected.clone());
            prop_assert!(!expected.contains('\\'));
            prop_assert!(!expected.starts_with('/'));
        }

        #[test]
        fn prop_blank_output_directory_adds_no_prefix(
            relative in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
            blank in "[ \t]{0,3}",
        ) {
            prop_assert_eq!(remote_path(Some(blank.as_str()), &relative), relative.clone());
            prop_assert_eq!(remote_path(None, &relative), relative);
        }
    }
}
