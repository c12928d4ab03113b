//! Subcommand handlers for camera and config actions.

use std::path::Path;

use digicam_remote::config::{default_path as get_config_path, Config, DEFAULT_CONFIG};
use digicam_remote::{
    status_code, CameraSession, CommandResult, Relay, SessionOptions, Setting, StartupStrategy,
    FAILURE_CODE, SUCCESS_CODE,
};

use super::args::{Args, Command, ConfigAction};

/// Session options from the config file, overridden by command-line flags.
pub fn session_options(config: &Config, args: &Args) -> SessionOptions {
    let mut options = config.session_options();
    if let Some(dir) = &args.install_dir {
        options.install_dir = dir.clone();
    }
    if args.quiet {
        options.verbose = false;
    }
    if args.poll && !matches!(options.startup, StartupStrategy::Poll { .. }) {
        options.startup = StartupStrategy::poll();
    }
    options
}

/// Run a camera subcommand and return its status code.
///
/// Values are printed to stdout; diagnostics go through the logger.
pub fn execute<R: Relay>(
    session: &mut CameraSession<R>,
    command: Command,
    config_path: Option<&Path>,
) -> i32 {
    match command {
        Command::Capture { location, no_af } => {
            session.set_autofocus(!no_af);
            print_value(session.capture(location.as_deref()))
        }
        Command::Get { setting } => print_value(session.get(setting.into())),
        Command::Set { setting, value } => status_code(&session.set(setting.into(), &value)),
        Command::List { setting } => match session.list(setting.into()) {
            Ok(values) => {
                for value in values {
                    println!("{}", value);
                }
                SUCCESS_CODE
            }
            Err(failure) => failure.code(),
        },
        Command::Folder { folder } => status_code(&session.set_folder(&folder)),
        Command::Name { name } => status_code(&session.set_image_name(&name)),
        Command::Counter { counter } => status_code(&session.set_counter(counter)),
        Command::Transfer { mode } => status_code(&session.set_transfer(mode.into())),
        Command::LiveView => status_code(&session.show_live_view()),
        Command::Run { subcommand } => status_code(&session.run(&subcommand.join(" "))),
        Command::SelfTest => self_test(session),
        Command::Config { action } => {
            handle_config_action(action, config_path);
            SUCCESS_CODE
        }
    }
}

/// List, set and read back every setting, printing one line per setting.
pub fn self_test<R: Relay>(session: &CameraSession<R>) -> i32 {
    println!("Beginning round-trip test:");
    let mut failed = 0;
    for setting in Setting::ALL {
        match session.verify_round_trip(setting) {
            Ok(value) => println!("  ok      {:<22} {}", setting.name(), value),
            Err(failure) => {
                println!("  FAILED  {:<22} {}", setting.name(), failure);
                failed += 1;
            }
        }
    }
    println!(
        "End round-trip test: {} of {} passed.",
        Setting::ALL.len() - failed,
        Setting::ALL.len()
    );

    if failed == 0 {
        SUCCESS_CODE
    } else {
        FAILURE_CODE
    }
}

fn print_value(result: CommandResult<String>) -> i32 {
    if let Ok(value) = &result {
        println!("{}", value);
    }
    status_code(&result)
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, custom_path: Option<&Path>) {
    let config_path = custom_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = match Config::load(Some(&config_path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let options = config.session_options();

            println!("Current configuration:");
            println!("  Install dir: {}", options.install_dir.display());
            println!("  Verbose: {}", if options.verbose { "yes" } else { "no" });
            match options.startup {
                StartupStrategy::FixedDelay(delay) => {
                    println!("  Startup: wait {}s", delay.as_secs())
                }
                StartupStrategy::Poll { attempts, interval } => println!(
                    "  Startup: poll up to {} times from {}ms",
                    attempts,
                    interval.as_millis()
                ),
            }
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'digicam config show' to view current settings.");
                std::process::exit(1);
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
