//! # Café POS Terminal
//!
//! ## Usage
//! ```bash
//! # Default configuration (café menu, R$, UTC)
//! cargo run -p cafe-terminal
//!
//! # Explicit config file
//! cargo run -p cafe-terminal -- --config ./cafe.toml
//!
//! # Verbose logs on stderr
//! RUST_LOG=debug cargo run -p cafe-terminal
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("--config requires a path");
                    return ExitCode::FAILURE;
                }
            }
            "--help" | "-h" => {
                println!("Café POS Terminal");
                println!();
                println!("Usage: cafe-terminal [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: CAFE_CONFIG or the user config dir)");
                println!("  -h, --help           Show this help message");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {other} (see --help)");
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    cafe_terminal::init_tracing();

    match cafe_terminal::run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal stopped");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
