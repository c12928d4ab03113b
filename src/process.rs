//! Host process discovery and launching.
//!
//! digiCamControl has to be running before the relay can reach a camera. The
//! session asks a [`ProcessControl`] whether it is, and to start it if not, so
//! tests can substitute a fake for the host process table.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sysinfo::System;

/// Executable name of the long-lived digiCamControl application.
pub const CONTROL_APPLICATION: &str = "CameraControl.exe";

/// Errors that can occur while looking up or launching processes.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to look up running processes: {0}")]
    LookupFailed(String),

    #[error("Failed to launch {}: {source}", .program.display())]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Process lookup and launch capability.
pub trait ProcessControl {
    /// Whether a process with executable name `name` is running.
    fn is_running(&self, name: &str) -> Result<bool, ProcessError>;

    /// Start `program` in the background and return without waiting for it.
    fn launch(&self, program: &Path, working_dir: &Path) -> Result<(), ProcessError>;
}

/// [`ProcessControl`] backed by the host's process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcesses;

impl ProcessControl for SystemProcesses {
    fn is_running(&self, name: &str) -> Result<bool, ProcessError> {
        let sys = System::new_all();
        let found = sys
            .processes()
            .values()
            .any(|p| name_matches(p.name(), name));
        log::debug!("{} running: {}", name, found);
        Ok(found)
    }

    fn launch(&self, program: &Path, working_dir: &Path) -> Result<(), ProcessError> {
        let mut cmd = Command::new(program);
        cmd.current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        // The child outlives us; dropping the handle does not kill it.
        let child = cmd.spawn().map_err(|source| ProcessError::LaunchFailed {
            program: program.to_path_buf(),
            source,
        })?;
        log::debug!("Launched {} (pid {})", program.display(), child.id());
        Ok(())
    }
}

/// Whether a process name reported by the OS is the executable `name`.
///
/// Only the process name is compared, never its arguments, so another program
/// that merely has the executable open does not count.
pub fn name_matches(process_name: &OsStr, name: &str) -> bool {
    !name.is_empty() && process_name.to_string_lossy().eq_ignore_ascii_case(name)
}
