//! Configuration constants.
//!
//! Defaults for timeouts, limits, and other operational parameters. All of
//! them can be overridden from the CLI.

use std::time::Duration;

/// Default SQLite database path.
pub const DB_PATH: &str = "./page_audit.db";

/// Maximum URL length (2048 characters) accepted for analysis.
/// Matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Default timeout for the primary page fetch, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Default per-probe timeout, in seconds. Each HEAD probe carries its own
/// timeout independent of the others.
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Default upper bound on concurrently in-flight link probes.
/// Bounded so a link-heavy page does not overwhelm the local network stack
/// or the target site.
pub const PROBE_CONCURRENCY: usize = 10;

/// Overall deadline for one analysis call. When it elapses, in-flight probes
/// are abandoned and nothing is persisted.
pub const ANALYSIS_DEADLINE: Duration = Duration::from_secs(60);

/// Default User-Agent string for HTTP requests.
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
