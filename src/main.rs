mod cli;

use clap::Parser;
use cli::{Args, Command};
use digicam_remote::config::Config;
use digicam_remote::{CameraSession, SUCCESS_CODE};

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.quiet);

    // Config actions work without digiCamControl
    if let Command::Config { action } = &args.command {
        cli::handle_config_action(action.clone(), args.config.as_deref());
        return;
    }

    let cfg = match Config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let options = cli::session_options(&cfg, &args);

    let mut session = match CameraSession::open(&options) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config_path = args.config.clone();
    let code = cli::execute(&mut session, args.command, config_path.as_deref());
    if code != SUCCESS_CODE {
        std::process::exit(1);
    }
}
