//! Configuration types and CLI options.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_USER_AGENT, FETCH_TIMEOUT_SECS, PROBE_CONCURRENCY, PROBE_TIMEOUT_SECS,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "page_audit", version, about)]
pub struct Config {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Opaque owner identity scoping stored results. Authentication is the
    /// caller's concern; this is just the scoping key.
    #[arg(long, global = true, env = "PAGE_AUDIT_OWNER", default_value = "local")]
    pub owner: String,

    /// SQLite database path
    #[arg(long, global = true, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Primary page fetch timeout in seconds
    #[arg(long, global = true, default_value_t = FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Per-link probe timeout in seconds
    #[arg(long, global = true, default_value_t = PROBE_TIMEOUT_SECS)]
    pub probe_timeout_seconds: u64,

    /// Maximum concurrent link probes
    #[arg(long, global = true, default_value_t = PROBE_CONCURRENCY)]
    pub probe_concurrency: usize,

    /// HTTP User-Agent header value
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

/// What to do with the store.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Analyze a page and print the stored result as JSON
    Analyze {
        /// Absolute http(s) URL of the page to analyze
        url: String,
        /// Also print the raw fetched HTML
        #[arg(long)]
        debug: bool,
    },
    /// Print one stored analysis by id (owner-scoped)
    Get {
        /// Analysis id
        id: i64,
    },
    /// List the owner's stored analyses
    List,
    /// Delete stored analyses by id (owner-scoped)
    Delete {
        /// One or more analysis ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}
