//! Invocation of the digiCamControl single-command relay.
//!
//! Every camera operation is one short-lived `CameraControlRemoteCmd.exe`
//! process: `/c <subcommand>` in, plain text out.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// File name of the relay executable inside the installation directory.
pub const RELAY_EXECUTABLE: &str = "CameraControlRemoteCmd.exe";

/// Errors that can occur while running the relay.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Relay exited with code {code:?}: {output}")]
    Exited { code: Option<i32>, output: String },
}

/// Something that can forward a subcommand to digiCamControl and return its text response.
pub trait Relay {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError>;
}

impl<R: Relay + ?Sized> Relay for &R {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
        (**self).invoke(subcommand)
    }
}

impl<R: Relay + ?Sized> Relay for Box<R> {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
        (**self).invoke(subcommand)
    }
}

/// The real relay: spawns `CameraControlRemoteCmd.exe` from the installation directory.
#[derive(Debug, Clone)]
pub struct ProcessRelay {
    install_dir: PathBuf,
}

impl ProcessRelay {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Full path of the relay executable.
    pub fn program(&self) -> PathBuf {
        self.install_dir.join(RELAY_EXECUTABLE)
    }

    /// The relay command for one subcommand, run from the installation directory.
    pub fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.current_dir(&self.install_dir);

        // Quoting must reach the relay untouched; it parses its own command line.
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.arg("/c").raw_arg(subcommand);
        }
        #[cfg(not(windows))]
        cmd.args(relay_args(subcommand));

        cmd
    }
}

impl Relay for ProcessRelay {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
        let program = self.program();
        let output = self
            .command(subcommand)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| RelayError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RelayError::Exited {
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

/// Command-line arguments for one relay call, split the way a shell would.
///
/// Words are separated by whitespace; a double-quoted span stays one word and
/// loses its quotes. Used where the subcommand cannot be passed through verbatim.
pub fn relay_args(subcommand: &str) -> Vec<String> {
    let mut args = vec!["/c".to_string()];
    let mut word = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in subcommand.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    args.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        args.push(word);
    }
    args
}
