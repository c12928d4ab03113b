//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{SettingArg, TransferArg};

/// Drive a camera through an installed digiCamControl
#[derive(Parser, Debug)]
#[command(name = "digicam")]
#[command(version, about = "Control a camera through digiCamControl", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// digiCamControl installation directory
    #[arg(long, short = 'd', global = true)]
    pub install_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Only report warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Probe digiCamControl for readiness instead of waiting a fixed delay
    #[arg(long, global = true)]
    pub poll: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Take a picture and print where it was saved
    Capture {
        /// Location and file name for the picture
        location: Option<String>,
        /// Shoot without autofocus
        #[arg(long)]
        no_af: bool,
    },
    /// Print the current value of a setting
    Get { setting: SettingArg },
    /// Change a setting
    Set {
        setting: SettingArg,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List the accepted values of a setting
    List { setting: SettingArg },
    /// Set the folder pictures are saved to
    Folder { folder: String },
    /// Set the file name prefix of new pictures
    Name { name: String },
    /// Reset the file name counter
    Counter {
        #[arg(default_value = "0")]
        counter: u32,
    },
    /// Choose where pictures are stored
    Transfer { mode: TransferArg },
    /// Open the live view window
    LiveView,
    /// Send a raw relay subcommand
    Run {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        subcommand: Vec<String>,
    },
    /// List, set and read back every setting
    SelfTest,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["digicam", "live-view"]);
        assert!(matches!(args.command, Command::LiveView));
        assert!(args.install_dir.is_none());
        assert!(args.config.is_none());
        assert!(!args.quiet);
        assert!(!args.poll);
    }

    #[test]
    fn test_args_capture() {
        let args = Args::parse_from(["digicam", "capture"]);
        assert!(matches!(
            args.command,
            Command::Capture {
                location: None,
                no_af: false
            }
        ));

        let args = Args::parse_from(["digicam", "capture", r"C:\shots\img.jpg", "--no-af"]);
        match args.command {
            Command::Capture { location, no_af } => {
                assert_eq!(location.as_deref(), Some(r"C:\shots\img.jpg"));
                assert!(no_af);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_set_negative_value() {
        let args = Args::parse_from(["digicam", "set", "exposure-comp", "-1.0"]);
        match args.command {
            Command::Set { setting, value } => {
                assert_eq!(setting, SettingArg::ExposureComp);
                assert_eq!(value, "-1.0");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_counter_default() {
        let args = Args::parse_from(["digicam", "counter"]);
        assert!(matches!(args.command, Command::Counter { counter: 0 }));
    }

    #[test]
    fn test_args_transfer() {
        let args = Args::parse_from(["digicam", "transfer", "pc-only"]);
        assert!(matches!(
            args.command,
            Command::Transfer {
                mode: TransferArg::PcOnly
            }
        ));
    }

    #[test]
    fn test_args_run_collects_words() {
        let args = Args::parse_from(["digicam", "run", "do", "LiveViewWnd_Show"]);
        match args.command {
            Command::Run { subcommand } => assert_eq!(subcommand, vec!["do", "LiveViewWnd_Show"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_global_options_after_subcommand() {
        let args = Args::parse_from(["digicam", "get", "iso", "-d", "/opt/dcc", "--quiet", "--poll"]);
        assert_eq!(args.install_dir, Some(PathBuf::from("/opt/dcc")));
        assert!(args.quiet);
        assert!(args.poll);
    }

    #[test]
    fn test_args_config_subcommand() {
        let args = Args::parse_from(["digicam", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }

    #[test]
    fn test_args_rejects_unknown_setting() {
        assert!(Args::try_parse_from(["digicam", "get", "focus"]).is_err());
    }
}
