//! Defines the command-line arguments.
//!
//! Every option is optional here so that values from the configuration file
//! and environment can fill the gaps; defaults are applied in
//! [`crate::config::Settings::resolve`].
use clap::Parser;
use std::path::PathBuf;

use crate::config::FetchFailurePolicy;

/// Holds the parsed CLI arguments.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Live per-interval view of a proxy's admin stats",
    long_about = None
)]
pub struct Args {
    #[arg(
        short = 'a',
        long = "admin",
        help = "URI of the admin interface with access to /stats, including scheme [default: http://localhost:9901]"
    )]
    pub admin: Option<String>,
    #[arg(
        short = 'p',
        long = "prefix",
        help = "Prefix prepended to every requested field"
    )]
    pub prefix: Option<String>,
    #[arg(
        short = 'i',
        long = "interval",
        help = "Sample interval in seconds [default: 1]"
    )]
    pub interval_secs: Option<f64>,
    #[arg(
        short = 'f',
        long = "fields",
        num_args = 1..,
        help = "Field names without the prefix; a trailing '-' marks a gauge"
    )]
    pub fields: Option<Vec<String>>,
    #[arg(
        short = 't',
        long = "timeout-ms",
        help = "Timeout for each admin request in milliseconds [default: 100]"
    )]
    pub timeout_ms: Option<u64>,
    #[arg(
        long = "on-fetch-error",
        value_enum,
        help = "What to do when a sample cannot be fetched [default: skip]"
    )]
    pub on_fetch_error: Option<FetchFailurePolicy>,
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to an optional TOML configuration file"
    )]
    pub config_path: Option<PathBuf>,
    #[arg(
        short = 'l',
        long = "log-file",
        help = "Path to the log file. If not set, logs are written to stderr."
    )]
    pub log_file: Option<PathBuf>,
    #[arg(
        long = "list-fields",
        help = "Print the metric names available under the prefix and exit"
    )]
    pub list_fields: bool,
}
