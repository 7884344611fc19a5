//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Default tracked-entry configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
/// Default run state file
pub const DEFAULT_STATE_PATH: &str = "sync_state.json";

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .default_value(DEFAULT_CONFIG_PATH)
        .value_parser(value_parser!(PathBuf))
        .help("Tracked-entry configuration file")
}

/// Build the `tracksync` command
#[must_use]
pub fn command() -> Command {
    Command::new("tracksync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("One-way sync from markdown progress documents to Trello cards")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Sync every configured entry")
                .arg(config_arg())
                .arg(
                    Arg::new("state")
                        .long("state")
                        .default_value(DEFAULT_STATE_PATH)
                        .value_parser(value_parser!(PathBuf))
                        .help("Run state file, rewritten after the batch"),
                )
                .arg(
                    Arg::new("json-logs")
                        .long("json-logs")
                        .action(ArgAction::SetTrue)
                        .help("Emit logs as JSON lines (also TRACKSYNC_LOG_JSON=1)"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a local progress document and print it as JSON")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Progress document to parse"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("Read section markers from this configuration file"),
                ),
        )
}
