//! tracksync command line
//!
//! - `tracksync run`: sync every configured entry, persist run state
//! - `tracksync parse <FILE>`: parse a local document, print it as JSON
//!
//! Exit codes: `0` clean, `1` some entry or write failed, `2` unusable
//! configuration.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod telemetry;

// Re-exports for convenience
pub use cli::{command, DEFAULT_CONFIG_PATH, DEFAULT_STATE_PATH};
pub use commands::{load_env_file, parse_file, run, run_batch, ExitStatus, RunOptions};
pub use telemetry::{env_bool, init_tracing, ENV_LOG_JSON};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
