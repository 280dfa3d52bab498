//! # cafe-terminal: Counter Menu for the Café POS
//!
//! Text menu over stdin/stdout. Owns one catalog and one open order for
//! the lifetime of the process; nothing is persisted.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Terminal Startup                                  │
//! │                                                                         │
//! │  1. init_tracing()          RUST_LOG or "warn", written to stderr      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. TerminalConfig::load()  defaults → cafe.toml → CAFE_* variables    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. Session::new()          café menu seeded unless seed_menu = false  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. Session::run()          menu loop until option 5 or end of input   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod session;

use std::io;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::TerminalConfig;
use error::AppError;
use session::Session;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with the menu.
///
/// ## Log Levels
/// - `RUST_LOG=info` - Session start/end, catalog and order changes
/// - `RUST_LOG=cafe_core=debug` - Everything from the core crate
/// - Default: WARN level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration and runs one session on the process's stdin/stdout.
pub fn run(config_path: Option<PathBuf>) -> Result<(), AppError> {
    let config = TerminalConfig::load(config_path)?;
    info!(
        store = %config.store_name,
        seed_menu = config.seed_menu,
        "Starting terminal"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);
    session.run()
}
