//! CLI module for pingkeeper
//!
//! Command-line interface definitions and handlers for the pingkeeper daemon.
//!
//! # Commands
//!
//! - `run` - Start the ping service (and optionally the status server)
//! - `probe` - Probe one or more endpoints once and print the results
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Keep two services awake, pinging every 5 minutes
//! pingkeeper run https://my-api.example.com https://my-worker.example.com
//!
//! # One-shot probe with JSON output
//! pingkeeper probe --json https://my-api.example.com
//!
//! # Generate shell completions
//! pingkeeper completions bash > ~/.bash_completion.d/pingkeeper
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod probe;
pub mod run;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::pinger::ProbeMethod;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// pingkeeper - Keep free-tier backends awake
#[derive(Parser, Debug)]
#[command(
    name = "pingkeeper",
    version,
    about = "Keep free-tier backends awake with periodic pings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ping service
    Run(RunArgs),
    /// Probe endpoints once and print the results
    Probe(ProbeArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Endpoints to ping, in addition to those in the config file
    pub urls: Vec<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "pingkeeper.toml")]
    pub config: PathBuf,

    /// Override ping interval in milliseconds
    #[arg(short, long, env = "PINGKEEPER_INTERVAL_MS")]
    pub interval: Option<u64>,

    /// Override status server port
    #[arg(short, long, env = "PINGKEEPER_PORT")]
    pub port: Option<u16>,

    /// Override status server host
    #[arg(short = 'H', long, env = "PINGKEEPER_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PINGKEEPER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable the HTTP status server
    #[arg(long)]
    pub no_server: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Endpoints to probe
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// HTTP method for the probe request
    #[arg(short, long, value_enum, default_value = "get")]
    pub method: ProbeMethod,

    /// Timeout per request in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Extra attempts after a transport-level failure
    #[arg(long, default_value_t = 0)]
    pub retry_count: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "pingkeeper.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
