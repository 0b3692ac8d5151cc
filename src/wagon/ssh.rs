use std::fs;
use std::io::{BufReader, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use ssh2::{ExtendedData, Session, Sftp};

use super::{AuthenticationInfo, CommandExecutor, Repository, Wagon, WagonError};
use crate::constants::TRANSFER_BUFFER_SIZE;

/// Wagon for `scp://`, `sftp://` and `ssh://` repositories.
///
/// Files travel over SFTP; commands run on an exec channel inside the
/// repository base directory.
pub struct SshWagon {
    repository: Repository,
    session: Session,
}

impl SshWagon {
    /// Connect and authenticate.
    ///
    /// Authentication tries the private key first, then the password, then
    /// whatever the local ssh-agent offers.
    pub fn connect(
        repository: Repository,
        auth: &AuthenticationInfo,
        timeout_secs: u64,
    ) -> Result<Self, WagonError> {
        let host = repository
            .host()
            .ok_or_else(|| WagonError::InvalidRepository {
                url: repository.url().to_string(),
                reason: "missing host".to_string(),
            })?
            .to_string();
        let port = repository.port();

        let connection_error = |reason: String| WagonError::Connection {
            url: repository.url().to_string(),
            reason,
        };

        let tcp = TcpStream::connect((host.as_str(), port))
            .map_err(|e| connection_error(format!("failed to connect to {}:{}: {}", host, port, e)))?;

        let timeout = Duration::from_secs(timeout_secs);
        tcp.set_read_timeout(Some(timeout))?;
        tcp.set_write_timeout(Some(timeout))?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session
            .handshake()
            .map_err(|e| connection_error(format!("SSH handshake failed: {}", e)))?;

        let username = auth
            .username
            .clone()
            .or_else(|| repository.username().map(|u| u.to_string()))
            .ok_or_else(|| WagonError::Authentication {
                username: String::new(),
                host: host.clone(),
            })?;

        authenticate(&session, &username, auth);

        if !session.authenticated() {
            return Err(WagonError::Authentication { username, host });
        }

        info!("Connected to {} as {}", repository, username);
        Ok(Self {
            repository,
            session,
        })
    }

    fn remote_path(&self, destination: &str) -> String {
        format!(
            "{}/{}",
            self.repository.base_dir().trim_end_matches('/'),
            destination.trim_start_matches('/')
        )
    }

    fn sftp(&self) -> Result<Sftp, WagonError> {
        Ok(self.session.sftp()?)
    }
}

fn authenticate(session: &Session, username: &str, auth: &AuthenticationInfo) {
    if let Some(key) = &auth.private_key {
        match session.userauth_pubkey_file(username, None, key, auth.passphrase.as_deref()) {
            Ok(()) => return,
            Err(e) => warn!("Public key authentication with {} failed: {}", key.display(), e),
        }
    }

    if let Some(password) = &auth.password {
        match session.userauth_password(username, password) {
            Ok(()) => return,
            Err(e) => warn!("Password authentication failed: {}", e),
        }
    }

    if let Err(e) = session.userauth_agent(username) {
        debug!("ssh-agent authentication failed: {}", e);
    }
}

/// Create `dir` and any missing ancestors
fn mkdirs(sftp: &Sftp, dir: &str) -> Result<(), WagonError> {
    let mut current = String::new();
    for segment in dir.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);

        let path = Path::new(&current);
        if sftp.stat(path).is_ok() {
            continue;
        }
        if let Err(e) = sftp.mkdir(path, 0o755) {
            // Lost a race with another writer, or a real failure
            if sftp.stat(path).is_err() {
                return Err(e.into());
            }
        }
    }
    Ok(())
}

/// Single-quote `value` for a POSIX shell
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl Wagon for SshWagon {
    fn repository(&self) -> &Repository {
        &self.repository
    }

    fn put(&mut self, source: &Path, destination: &str) -> Result<(), WagonError> {
        let remote = self.remote_path(destination);
        let transfer_error = |reason: String| WagonError::Transfer {
            local: source.to_path_buf(),
            destination: destination.to_string(),
            reason,
        };

        let local = fs::File::open(source).map_err(|e| transfer_error(e.to_string()))?;
        let size = local.metadata().map(|m| m.len()).unwrap_or(0);
        let start = Instant::now();

        let sftp = self.sftp()?;
        if let Some((parent, _)) = remote.rsplit_once('/') {
            mkdirs(&sftp, parent).map_err(|e| transfer_error(e.to_string()))?;
        }

        let mut remote_file = sftp
            .create(Path::new(&remote))
            .map_err(|e| transfer_error(format!("failed to create remote file: {}", e)))?;

        let mut reader = BufReader::with_capacity(TRANSFER_BUFFER_SIZE, local);
        let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
        loop {
            let read = reader
                .read(&mut buffer)
                .map_err(|e| transfer_error(e.to_string()))?;
            if read == 0 {
                break;
            }
            remote_file
                .write_all(&buffer[..read])
                .map_err(|e| transfer_error(e.to_string()))?;
        }

        debug!(
            "Uploaded {} ({} bytes) to {} in {:?}",
            source.display(),
            size,
            remote,
            start.elapsed()
        );
        Ok(())
    }

    fn command_executor(&mut self) -> Option<&mut dyn CommandExecutor> {
        Some(self)
    }

    fn disconnect(&mut self) -> Result<(), WagonError> {
        debug!("Disconnecting from {}", self.repository);
        self.session.disconnect(None, "upload finished", None)?;
        Ok(())
    }
}

impl CommandExecutor for SshWagon {
    fn execute_command(&mut self, command: &str) -> Result<(), WagonError> {
        let full_command = format!(
            "cd {} && {}",
            shell_quote(self.repository.base_dir()),
            command
        );
        debug!("Executing remote command: {}", full_command);

        let mut channel = self.session.channel_session()?;
        // stderr shares the channel window; merged so one read drains both
        channel.handle_extended_data(ExtendedData::Merge)?;
        channel.exec(&full_command)?;

        let mut output = String::new();
        channel.read_to_string(&mut output)?;

        channel.wait_close()?;
        let status = channel.exit_status()?;

        command_result(command, status, &output)
    }
}

/// Map an exit status and the merged stdout/stderr of a command to a result
fn command_result(command: &str, status: i32, output: &str) -> Result<(), WagonError> {
    if status != 0 {
        return Err(WagonError::CommandFailed {
            command: command.to_string(),
            status,
            output: output.trim_end().to_string(),
        });
    }

    if !output.trim().is_empty() {
        debug!("{}", output.trim_end());
    }

    Ok(())
}
