//! Control a camera through digiCamControl's single-command relay.
//!
//! [`CameraSession`] locates (and if needed launches) digiCamControl, sends
//! one relay command per operation and decodes the plain-text response.
//!
//! ```no_run
//! use digicam_remote::{CameraSession, SessionOptions};
//!
//! let session = CameraSession::open(&SessionOptions::default())?;
//! for iso in session.list_iso()? {
//!     println!("{}", iso);
//! }
//! session.set_iso("200")?;
//! let path = session.capture(None)?;
//! println!("saved to {}", path);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod process;
pub mod relay;
pub mod response;
pub mod session;
pub mod setting;
pub mod startup;

pub use process::{ProcessControl, ProcessError, SystemProcesses};
pub use relay::{ProcessRelay, Relay, RelayError};
pub use response::{status_code, CommandFailure, CommandResult, FAILURE_CODE, SUCCESS_CODE};
pub use session::{CameraSession, SessionError, SessionOptions, DEFAULT_INSTALL_DIR};
pub use setting::{CaptureMode, Setting, TransferMode};
pub use startup::{Readiness, StartupStrategy};
