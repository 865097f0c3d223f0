//! Sarathi - drive an Open Interface robot vacuum from the keyboard
//!
//! ```text
//! sarathi [<config.toml> | --config <path> | -c <path>]
//! ```
//!
//! Without an argument, `sarathi.toml` in the working directory is used if
//! present, otherwise built-in defaults (`/dev/ttyUSB0`, 115200 baud).
//!
//! Exit status is 0 after a normal session and non-zero when the serial port
//! cannot be opened or the robot cannot be put into Safe mode.

use sarathi::config::AppConfig;
use sarathi::error::Result;
use sarathi::input::{KeySource, StreamKeys, TerminalKeys, watch_signals};
use sarathi::teleop::{Controller, SessionSummary};
use sarathi::transport::SerialTransport;
use std::env;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const DEFAULT_CONFIG_PATH: &str = "sarathi.toml";

/// Parse config path from command line arguments.
///
/// Supports:
/// - `sarathi <path>` (positional)
/// - `sarathi --config <path>` (flag-based)
/// - `sarathi -c <path>` (short flag)
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    None
}

fn load_config() -> Result<AppConfig> {
    match parse_config_path() {
        Some(path) => {
            log::info!("Using config: {}", path);
            AppConfig::from_file(path)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            log::info!("Using config: {}", DEFAULT_CONFIG_PATH);
            AppConfig::from_file(DEFAULT_CONFIG_PATH)
        }
        None => {
            log::info!("Using default configuration");
            Ok(AppConfig::default())
        }
    }
}

fn run() -> Result<SessionSummary> {
    log::info!("Sarathi v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    watch_signals(Arc::clone(&shutdown))?;

    let mut keys: Box<dyn KeySource> = if io::stdin().is_terminal() {
        Box::new(TerminalKeys::new(shutdown))
    } else {
        log::info!("stdin is not a terminal, reading keys from stream");
        Box::new(StreamKeys::stdin(shutdown)?)
    };

    let transport = SerialTransport::open(&config.serial)?;
    log::info!(
        "Waiting {} ms for the robot to wake up",
        config.serial.wake_delay_ms
    );
    let controller = Controller::start(transport, &config.teleop, config.serial.wake_delay())?;

    println!("Connected to robot. Control keys:");
    println!("{}", controller.keymap().help_text());

    Ok(controller.run(&mut keys))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(summary) => {
            log::info!(
                "Session ended ({}): {} keys handled, {} failed writes",
                summary.reason,
                summary.keys_handled,
                summary.failed_writes
            );
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
