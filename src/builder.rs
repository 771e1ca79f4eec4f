//! clap `Command` tree for the `holded` binary
//!
//! Structure: `holded <group> <command> [args] [--options]`, with a global
//! `--json` switch selecting the machine-readable output envelope.

use std::time::Duration;

use clap::{Arg, ArgAction, Command};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_PING_PATH};

pub const DEFAULT_PING_TIMEOUT: &str = "10s";
pub const DEFAULT_CATALOG_TIMEOUT: &str = "15s";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";

/// Build the full command tree.
pub fn build_cli() -> Command {
    Command::new("holded")
        .about("Command-line client for the Holded API")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .after_help(
            "Credential priority:\n  --api-key > HOLDED_API_KEY > ~/.config/holdedcli/config.yaml",
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print a JSON envelope instead of text"),
        )
        .subcommand(auth_command())
        .subcommand(ping_command())
        .subcommand(actions_command())
}

fn auth_command() -> Command {
    Command::new("auth")
        .about("Manage the stored API key")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("set").about("Save an API key").arg(
                Arg::new("api-key")
                    .long("api-key")
                    .required(true)
                    .help("Holded API key"),
            ),
        )
        .subcommand(Command::new("status").about("Show where the API key comes from"))
}

fn ping_command() -> Command {
    Command::new("ping")
        .about("Check that the Holded API is reachable with the current key")
        .arg(api_key_arg())
        .arg(base_url_arg())
        .arg(
            Arg::new("path")
                .long("path")
                .default_value(DEFAULT_PING_PATH)
                .help("API path to request"),
        )
        .arg(timeout_arg("timeout", DEFAULT_PING_TIMEOUT, "Request timeout"))
}

fn actions_command() -> Command {
    Command::new("actions")
        .about("Discover and run API actions from the reference docs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List every known action")
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .help("Filter by id, operation, method, path or API"),
                )
                .arg(timeout_arg("timeout", DEFAULT_CATALOG_TIMEOUT, "Catalog loading timeout")),
        )
        .subcommand(
            Command::new("describe")
                .about("Show parameters and body fields of an action")
                .arg(action_ref_arg())
                .arg(timeout_arg("timeout", DEFAULT_CATALOG_TIMEOUT, "Catalog loading timeout")),
        )
        .subcommand(run_command())
}

fn run_command() -> Command {
    Command::new("run")
        .about("Call an action")
        .arg(action_ref_arg())
        .arg(api_key_arg())
        .arg(base_url_arg())
        .arg(pair_arg("path", "Path parameter key=value (repeatable)"))
        .arg(pair_arg("query", "Query parameter key=value (repeatable)"))
        .arg(pair_arg("header", "Extra request header key=value (repeatable)"))
        .arg(
            Arg::new("body")
                .long("body")
                .conflicts_with_all(["body-file", "file"])
                .help("JSON request body"),
        )
        .arg(
            Arg::new("body-file")
                .long("body-file")
                .conflicts_with("file")
                .help("Path to a JSON request body file"),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Upload a file as multipart/form-data field 'file'"),
        )
        .arg(timeout_arg("timeout", DEFAULT_REQUEST_TIMEOUT, "Request timeout"))
        .arg(timeout_arg(
            "catalog-timeout",
            DEFAULT_CATALOG_TIMEOUT,
            "Catalog loading timeout",
        ))
}

fn action_ref_arg() -> Arg {
    Arg::new("action")
        .required(true)
        .value_name("ACTION")
        .help("Action id or operation id")
}

fn api_key_arg() -> Arg {
    Arg::new("api-key").long("api-key").help("Holded API key")
}

fn base_url_arg() -> Arg {
    Arg::new("base-url")
        .long("base-url")
        .default_value(DEFAULT_BASE_URL)
        .help("Holded API base URL")
}

fn pair_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help(help)
}

fn timeout_arg(name: &'static str, default: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .default_value(default)
        .value_parser(parse_duration)
        .help(help)
}

fn parse_duration(raw: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(raw.trim())
}

/// Split `key=value`, trimming both sides. The key must be non-empty.
pub fn split_key_value(pair: &str) -> Option<(String, String)> {
    let (key, value) = pair.trim().split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
