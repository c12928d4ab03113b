//! Shared fakes for session tests: a scripted relay, a stateful camera and a
//! recording process table. Nothing here starts a real process.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use digicam_remote::process::ProcessError;
use digicam_remote::relay::RELAY_EXECUTABLE;
use digicam_remote::{ProcessControl, Relay, RelayError, SessionOptions, StartupStrategy};

/// Wrap a payload in the relay's 96/6 character envelope.
pub fn envelope(payload: &str) -> String {
    format!("{:<96}{}\"}}\r\n\r\n", ":;response:", payload)
}

/// An error response whose message starts at character 109.
pub fn error_response(message: &str) -> String {
    format!("{:<109}{}", ":;response:", message)
}

/// A successful `set` / plain command response.
pub fn ok_response() -> String {
    r#"{"response":null,"success":true}"#.to_string()
}

/// Temporary installation directory containing a placeholder relay executable.
pub fn install_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(RELAY_EXECUTABLE), b"").unwrap();
    dir
}

/// Options that never sleep.
pub fn options(dir: &Path) -> SessionOptions {
    SessionOptions::new(dir)
        .verbose(false)
        .startup(StartupStrategy::FixedDelay(Duration::ZERO))
}

/// Relay that replays canned responses and records every subcommand.
#[derive(Default)]
pub struct ScriptedRelay {
    responses: RefCell<VecDeque<Result<String, RelayError>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRelay {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn push_error(&self, error: RelayError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Relay for ScriptedRelay {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
        self.calls.borrow_mut().push(subcommand.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Relay that behaves like digiCamControl with a camera attached: settings
/// remember their value and only accept listed values.
pub struct FakeCamera {
    settings: RefCell<HashMap<String, (String, Vec<String>)>>,
    calls: RefCell<Vec<String>>,
}

impl FakeCamera {
    pub fn new() -> Self {
        let mut settings = HashMap::new();
        let mut add = |key: &str, values: &[&str]| {
            let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            settings.insert(key.to_string(), (values[values.len() - 1].clone(), values));
        };
        add("shutterspeed", &["1/4000", "1/250", "1/50", "1s"]);
        add("Iso", &["100", "200", "400", "800"]);
        add("aperture", &["2.8", "4.0", "8.0"]);
        add("exposurecompensation", &["-1.0", "0.0", "+1.0"]);
        add("compressionsetting", &["RAW", "JPEG (BASIC)", "JPEG (FINE)"]);
        add("whitebalance", &["Auto", "Daylight", "Cloudy"]);
        Self {
            settings: RefCell::new(settings),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Relay for FakeCamera {
    fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
        self.calls.borrow_mut().push(subcommand.to_string());
        let words: Vec<&str> = subcommand.split_whitespace().collect();
        let mut settings = self.settings.borrow_mut();

        let response = match words.as_slice() {
            ["get", key] => match settings.get(*key) {
                Some((current, _)) => envelope(current),
                None => error_response(&format!("Unknown parameter {}", key)),
            },
            ["list", key] => match settings.get(*key) {
                Some((_, values)) => {
                    let quoted: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
                    envelope(&quoted.join(","))
                }
                None => error_response(&format!("Unknown parameter {}", key)),
            },
            ["set", key, value @ ..] => {
                let value = value.join(" ");
                match settings.get_mut(*key) {
                    Some((current, values)) if values.contains(&value) => {
                        *current = value;
                        ok_response()
                    }
                    Some(_) => error_response(&format!("Wrong value {} for {}", value, key)),
                    None => error_response(&format!("Unknown parameter {}", key)),
                }
            }
            _ => ok_response(),
        };
        Ok(response)
    }
}

/// Process table fake that records launches.
#[derive(Default)]
pub struct FakeProcesses {
    pub running: bool,
    pub fail_lookup: bool,
    pub queries: RefCell<Vec<String>>,
    pub launched: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeProcesses {
    pub fn running() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    pub fn stopped() -> Self {
        Self::default()
    }
}

impl ProcessControl for FakeProcesses {
    fn is_running(&self, name: &str) -> Result<bool, ProcessError> {
        self.queries.borrow_mut().push(name.to_string());
        if self.fail_lookup {
            return Err(ProcessError::LookupFailed("process table unavailable".to_string()));
        }
        Ok(self.running)
    }

    fn launch(&self, program: &Path, working_dir: &Path) -> Result<(), ProcessError> {
        self.launched
            .borrow_mut()
            .push((program.to_path_buf(), working_dir.to_path_buf()));
        Ok(())
    }
}
