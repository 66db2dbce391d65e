//! page_audit library: the page analysis engine.
//!
//! Given an absolute URL and an owner identity, the engine fetches the page,
//! sniffs the HTML version from the doctype, extracts the title and heading
//! distribution, classifies every link as internal or external, probes link
//! reachability with a bounded pool of HEAD requests, runs a login-form
//! heuristic, and reconciles the result into SQLite keyed by
//! `(url, owner_id)`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use page_audit::{AnalysisRequest, Analyzer, AnalyzerOptions};
//! use page_audit::storage::{init_db_pool_with_path, run_migrations, AnalysisStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = init_db_pool_with_path(std::path::Path::new("./page_audit.db")).await?;
//! run_migrations(&pool).await?;
//!
//! let client = Arc::new(reqwest::Client::new());
//! let analyzer = Analyzer::new(
//!     Arc::clone(&client),
//!     client,
//!     AnalysisStore::new(pool),
//!     AnalyzerOptions {
//!         probe_concurrency: 10,
//!         probe_timeout: Duration::from_secs(5),
//!     },
//! );
//!
//! let outcome = analyzer
//!     .analyze(
//!         &AnalysisRequest {
//!             url: "https://example.com".to_string(),
//!             owner_id: "local".to_string(),
//!             debug: false,
//!         },
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//! println!("{} links unreachable", outcome.result.inaccessible_links.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod analyze;
pub mod config;
mod error_handling;
pub mod initialization;
mod models;
pub mod storage;

// Re-export public API
pub use analyze::{
    classify_links, probe_links, sniff_html_version, AnalysisRequest, Analyzer, AnalyzerOptions,
    LinkSummary, UNKNOWN_VERSION,
};
pub use config::{Command, Config, LogFormat, LogLevel};
pub use error_handling::{AnalysisError, DatabaseError, InitializationError};
pub use models::{AnalysisOutcome, AnalysisResult, HeadingCounts, NewAnalysis};
