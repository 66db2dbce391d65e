//! HTTP client initialization.
//!
//! Two clients are built once at startup: one for the primary page fetch and
//! one for link reachability probes.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for the primary page fetch.
///
/// Redirects follow reqwest's default policy (up to 10 hops), matching the
/// fetch contract: the body at the final hop is what gets analyzed.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used for HEAD reachability probes.
///
/// Carries the probe timeout as a client-level ceiling; each probe still
/// applies its own `tokio::time::timeout` so one slow target cannot consume
/// another probe's budget.
pub fn init_probe_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.probe_timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
