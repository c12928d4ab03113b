//! Camera session: one digiCamControl installation driven through its relay.
//!
//! Every operation is a synchronous relay call whose text response is
//! classified by [`crate::response`]. Failures are logged and returned as a
//! [`CommandFailure`]; nothing panics and nothing is retried.

use std::path::{Path, PathBuf};

use crate::process::{ProcessControl, ProcessError, SystemProcesses, CONTROL_APPLICATION};
use crate::relay::{ProcessRelay, Relay, RELAY_EXECUTABLE};
use crate::response::{self, CommandFailure, CommandResult};
use crate::setting::{CaptureMode, Setting, TransferMode};
use crate::startup::{self, StartupStrategy};

/// Where the digiCamControl installer puts the application by default.
pub const DEFAULT_INSTALL_DIR: &str = r"C:\Program Files (x86)\digiCamControl";

/// Relay key holding the path of the most recent capture.
pub const LAST_CAPTURED_KEY: &str = "lastcaptured";
pub const FOLDER_KEY: &str = "session.folder";
pub const IMAGE_NAME_KEY: &str = "session.name";
pub const COUNTER_KEY: &str = "session.Counter";

const LIVE_VIEW_COMMAND: &str = "do LiveViewWnd_Show";

/// Options for opening a [`CameraSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// digiCamControl installation directory.
    pub install_dir: PathBuf,
    /// Log successful operations at info level instead of debug.
    pub verbose: bool,
    /// How to wait for digiCamControl if it has to be launched.
    pub startup: StartupStrategy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            verbose: true,
            startup: StartupStrategy::default(),
        }
    }
}

impl SessionOptions {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn startup(mut self, startup: StartupStrategy) -> Self {
        self.startup = startup;
        self
    }
}

/// Errors that prevent a session from being opened.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("digiCamControl not found in '{}'", .install_dir.display())]
    NotInstalled { install_dir: PathBuf },

    #[error(transparent)]
    Launch(#[from] ProcessError),
}

/// A connection to a running digiCamControl through its command-line relay.
#[derive(Debug)]
pub struct CameraSession<R = ProcessRelay> {
    install_dir: PathBuf,
    verbose: bool,
    capture_mode: CaptureMode,
    relay: R,
}

impl CameraSession<ProcessRelay> {
    /// Open a session against the real relay and the host process table.
    pub fn open(options: &SessionOptions) -> Result<Self, SessionError> {
        Self::open_with(options, &SystemProcesses)
    }

    /// Open a session against the real relay, using `processes` to find or
    /// launch digiCamControl.
    pub fn open_with<P: ProcessControl + ?Sized>(
        options: &SessionOptions,
        processes: &P,
    ) -> Result<Self, SessionError> {
        let relay = ProcessRelay::new(&options.install_dir);
        CameraSession::with_relay(options, relay, processes)
    }
}

impl<R: Relay> CameraSession<R> {
    /// Open a session that sends commands through `relay`.
    ///
    /// Fails with [`SessionError::NotInstalled`] if the relay executable is
    /// missing from the installation directory; in that case no process is
    /// queried or launched. If digiCamControl is not running it is launched and
    /// the configured startup strategy is applied before returning.
    pub fn with_relay<P: ProcessControl + ?Sized>(
        options: &SessionOptions,
        relay: R,
        processes: &P,
    ) -> Result<Self, SessionError> {
        let install_dir = options.install_dir.clone();
        if !install_dir.join(RELAY_EXECUTABLE).exists() {
            let err = SessionError::NotInstalled { install_dir };
            log::error!("{}", err);
            return Err(err);
        }

        let session = Self {
            install_dir,
            verbose: options.verbose,
            capture_mode: CaptureMode::default(),
            relay,
        };

        let running = match processes.is_running(CONTROL_APPLICATION) {
            Ok(running) => running,
            Err(e) => {
                log::warn!("Could not check whether digiCamControl is running: {}", e);
                false
            }
        };

        if !running {
            session.open_program(processes)?;
            startup::wait_until_ready(options.startup, &session.relay);
        }

        Ok(session)
    }

    /// Launch `CameraControl.exe` from the installation directory.
    fn open_program<P: ProcessControl + ?Sized>(&self, processes: &P) -> Result<(), SessionError> {
        let program = self.install_dir.join(CONTROL_APPLICATION);
        self.note(&format!("Starting {}", program.display()));
        processes.launch(&program, &self.install_dir)?;
        Ok(())
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn capture_mode(&self) -> CaptureMode {
        self.capture_mode
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    // Primitives

    /// Send an arbitrary subcommand. Succeeds if the response contains `null` or `""`.
    pub fn run(&self, cmd: &str) -> CommandResult {
        let result = self.invoke(cmd).and_then(|raw| response::decode_run(&raw));
        self.reported(result)
    }

    /// `set <key> <value>`. Succeeds if the response contains `null`.
    pub fn set_value(&self, key: &str, value: &str) -> CommandResult {
        let result = self
            .invoke(&format!("set {} {}", key, value))
            .and_then(|raw| response::decode_set(&raw));
        if result.is_ok() {
            self.note(&format!("Set the {} to {}", key, value));
        }
        self.reported(result)
    }

    /// `get <key>`. Returns the payload inside the relay's envelope.
    pub fn get_value(&self, key: &str) -> CommandResult<String> {
        let result = self
            .invoke(&format!("get {}", key))
            .and_then(|raw| response::decode_get(&raw));
        if let Ok(value) = &result {
            self.note(&format!("Current {}: {}", key, value));
        }
        self.reported(result)
    }

    /// `list <key>`. Returns the accepted values in the order the relay lists them.
    pub fn list_values(&self, key: &str) -> CommandResult<Vec<String>> {
        let result = self
            .invoke(&format!("list {}", key))
            .and_then(|raw| response::decode_list(&raw));
        if let Ok(values) = &result {
            self.note(&format!("List of all possible {}s: {:?}", key, values));
        }
        self.reported(result)
    }

    // Capture and session

    /// Take a picture, optionally saving it to `location`, and return the path
    /// digiCamControl reports as last captured.
    ///
    /// The path is queried even if the capture command itself failed.
    pub fn capture(&self, location: Option<&str>) -> CommandResult<String> {
        let token = self.capture_mode.token();
        let cmd = match location.filter(|l| !l.trim().is_empty()) {
            Some(location) => format!("{} {}", token, location),
            None => token.to_string(),
        };
        if self.run(&cmd).is_ok() {
            self.note("Captured image.");
        }
        self.get_value(LAST_CAPTURED_KEY)
    }

    /// Folder where digiCamControl saves pictures.
    pub fn set_folder(&self, folder: &str) -> CommandResult {
        self.set_value(FOLDER_KEY, folder)
    }

    /// File name prefix for new pictures.
    pub fn set_image_name(&self, name: &str) -> CommandResult {
        self.set_value(IMAGE_NAME_KEY, name)
    }

    /// Reset the file name counter.
    pub fn set_counter(&self, counter: u32) -> CommandResult {
        self.set_value(COUNTER_KEY, &counter.to_string())
    }

    /// Choose where pictures are stored.
    ///
    /// Goes through [`run`](Self::run), not [`set_value`](Self::set_value), so
    /// an empty-quoted response also counts as success.
    pub fn set_transfer(&self, mode: TransferMode) -> CommandResult {
        self.note(&format!("The pictures will be saved to {}.", mode));
        self.run(&format!("set transfer {}", mode.value()))
    }

    pub fn show_live_view(&self) -> CommandResult {
        self.note("Showing live view window.");
        self.run(LIVE_VIEW_COMMAND)
    }

    /// Select whether [`capture`](Self::capture) focuses first. No relay call.
    pub fn set_autofocus(&mut self, enabled: bool) {
        self.capture_mode = CaptureMode::from_autofocus(enabled);
        if enabled {
            self.note("Autofocus is on.");
        } else {
            self.note("Autofocus is off.");
        }
    }

    // Settings

    pub fn get(&self, setting: Setting) -> CommandResult<String> {
        self.get_value(setting.key())
    }

    pub fn set(&self, setting: Setting, value: &str) -> CommandResult {
        self.set_value(setting.key(), value)
    }

    pub fn list(&self, setting: Setting) -> CommandResult<Vec<String>> {
        self.list_values(setting.key())
    }

    /// Shutter speed, e.g. `1/250` or `1s`.
    pub fn set_shutterspeed(&self, shutter_speed: &str) -> CommandResult {
        self.set(Setting::ShutterSpeed, shutter_speed)
    }

    pub fn get_shutterspeed(&self) -> CommandResult<String> {
        self.get(Setting::ShutterSpeed)
    }

    pub fn list_shutterspeed(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::ShutterSpeed)
    }

    /// ISO value, e.g. `100` or `400`.
    pub fn set_iso(&self, iso: &str) -> CommandResult {
        self.set(Setting::Iso, iso)
    }

    pub fn get_iso(&self) -> CommandResult<String> {
        self.get(Setting::Iso)
    }

    pub fn list_iso(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::Iso)
    }

    /// Aperture, e.g. `2.8` or `8.0`.
    pub fn set_aperture(&self, aperture: &str) -> CommandResult {
        self.set(Setting::Aperture, aperture)
    }

    pub fn get_aperture(&self) -> CommandResult<String> {
        self.get(Setting::Aperture)
    }

    pub fn list_aperture(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::Aperture)
    }

    /// Exposure compensation, e.g. `-1.0` or `+2.3`.
    pub fn set_exposure_comp(&self, ec: &str) -> CommandResult {
        self.set(Setting::ExposureCompensation, ec)
    }

    pub fn get_exposure_comp(&self) -> CommandResult<String> {
        self.get(Setting::ExposureCompensation)
    }

    pub fn list_exposure_comp(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::ExposureCompensation)
    }

    /// Compression, e.g. `RAW` or `JPEG (BASIC)`.
    pub fn set_compression(&self, compression: &str) -> CommandResult {
        self.set(Setting::Compression, compression)
    }

    pub fn get_compression(&self) -> CommandResult<String> {
        self.get(Setting::Compression)
    }

    pub fn list_compression(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::Compression)
    }

    /// White balance, e.g. `Auto`, `Daylight` or `Cloudy`.
    pub fn set_whitebalance(&self, white_balance: &str) -> CommandResult {
        self.set(Setting::WhiteBalance, white_balance)
    }

    pub fn get_whitebalance(&self) -> CommandResult<String> {
        self.get(Setting::WhiteBalance)
    }

    pub fn list_whitebalance(&self) -> CommandResult<Vec<String>> {
        self.list(Setting::WhiteBalance)
    }

    /// List `setting`, set the first listed value and read it back.
    ///
    /// Returns the value that round-tripped.
    pub fn verify_round_trip(&self, setting: Setting) -> CommandResult<String> {
        let values = self.list(setting)?;
        let Some(first) = values.into_iter().next() else {
            let failure = CommandFailure::new(format!("no {} values listed", setting));
            return self.reported(Err(failure));
        };
        self.set(setting, &first)?;
        let current = self.get(setting)?;
        if current != first {
            return self.reported(Err(CommandFailure::new(format!(
                "{} read back as '{}' after setting '{}'",
                setting, current, first
            ))));
        }
        Ok(current)
    }

    fn invoke(&self, subcommand: &str) -> CommandResult<String> {
        log::debug!("{} /c {}", RELAY_EXECUTABLE, subcommand);
        self.relay
            .invoke(subcommand)
            .map_err(|e| CommandFailure::new(e.to_string()))
    }

    /// Log a failure before handing the result back.
    fn reported<T>(&self, result: CommandResult<T>) -> CommandResult<T> {
        if let Err(failure) = &result {
            log::error!("{}", failure);
        }
        result
    }

    /// Success diagnostics: info when verbose, debug otherwise.
    fn note(&self, message: &str) {
        if self.verbose {
            log::info!("{}", message);
        } else {
            log::debug!("{}", message);
        }
    }
}
