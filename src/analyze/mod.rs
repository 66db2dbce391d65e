//! The page analysis engine.
//!
//! `Analyzer` owns the pipeline: validate the URL, fetch the page, sniff the
//! doctype, extract title/headings, classify and probe links, run the
//! login-form heuristic, then reconcile the result against the store. The
//! leaf steps are stateless functions in the submodules.

mod doctype;
mod extract;
mod links;
mod login;

pub use doctype::{sniff_html_version, UNKNOWN_VERSION};
pub use links::{classify_links, probe_links, LinkSummary};

use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::AnalysisError;
use crate::models::{AnalysisOutcome, NewAnalysis};
use crate::storage::AnalysisStore;

/// Compiles a CSS selector that is known to be valid. Falls back to a
/// match-nothing selector rather than panicking if it is not.
pub(crate) fn compile_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| {
        log::error!("failed to parse selector '{css}': {e}");
        Selector::parse("*:not(*)").expect("fallback selector is valid")
    })
}

/// One analysis request, as handed over by the caller that owns
/// authentication and routing.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Absolute http(s) URL of the page to analyze.
    pub url: String,
    /// Opaque identity of the authenticated caller; scopes the stored result.
    pub owner_id: String,
    /// When set, the raw fetched body is returned alongside the result.
    pub debug: bool,
}

/// Tuning knobs for the engine's network behavior.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    /// Upper bound on concurrently in-flight link probes.
    pub probe_concurrency: usize,
    /// Timeout applied to each individual probe.
    pub probe_timeout: Duration,
}

/// Everything extracted from the parsed document in one pass.
///
/// Plain data only: the parsed tree is not `Send`, so it must not escape
/// into the async part of the pipeline.
#[derive(Debug, Clone)]
struct DocumentSummary {
    page_title: String,
    headings: crate::models::HeadingCounts,
    links: LinkSummary,
    has_login_form: bool,
}

/// Sequences one analysis per call; holds no cross-request mutable state.
pub struct Analyzer {
    client: Arc<reqwest::Client>,
    probe_client: Arc<reqwest::Client>,
    store: AnalysisStore,
    options: AnalyzerOptions,
}

impl Analyzer {
    /// Creates an analyzer from pre-built HTTP clients and a result store.
    ///
    /// `client` performs the primary GET (default redirect policy);
    /// `probe_client` issues the HEAD reachability probes.
    pub fn new(
        client: Arc<reqwest::Client>,
        probe_client: Arc<reqwest::Client>,
        store: AnalysisStore,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            client,
            probe_client,
            store,
            options,
        }
    }

    /// Runs the full pipeline for one request.
    ///
    /// On cancellation, in-flight work is abandoned and nothing is persisted;
    /// all other failures also abort before the reconcile step, so no partial
    /// result is ever stored.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        // Validate
        let parsed = parse_request_url(&request.url)?;
        let page_host = parsed.host_str().unwrap_or_default().to_string();

        // Fetch: only transport-level failures are fetch errors. A non-2xx
        // status still produces an analyzable body.
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            sent = self.client.get(parsed.clone()).send() => {
                sent.map_err(AnalysisError::Fetch)?
            }
        };
        let status = response.status();
        if !status.is_success() {
            log::info!("analyzing non-2xx page {} (status {status})", request.url);
        }
        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(AnalysisError::Cancelled),
            read = response.text() => read.map_err(|e| AnalysisError::Parse(e.to_string()))?,
        };

        // Sniff + Extract + Classify + Heuristic. The parse happens inside
        // a sync helper so the document tree never crosses an await point.
        let html_version = sniff_html_version(&body);
        let summary = summarize_document(&body, &page_host);
        log::debug!(
            "{}: version={html_version} title='{}' headings={} internal={} external={} probes={}",
            request.url,
            summary.page_title,
            summary.headings.total(),
            summary.links.internal,
            summary.links.external,
            summary.links.probe_targets.len()
        );

        let inaccessible_links = probe_links(
            &self.probe_client,
            &summary.links.probe_targets,
            self.options.probe_concurrency,
            self.options.probe_timeout,
            cancel,
        )
        .await?;

        // Reconcile: last cancellation check before touching the store, so a
        // cancelled call never persists.
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let result = self
            .store
            .upsert(&NewAnalysis {
                url: request.url.clone(),
                owner_id: request.owner_id.clone(),
                html_version: html_version.to_string(),
                page_title: summary.page_title,
                headings: summary.headings,
                internal_links: summary.links.internal,
                external_links: summary.links.external,
                inaccessible_links,
                has_login_form: summary.has_login_form,
            })
            .await?;

        Ok(AnalysisOutcome {
            result,
            raw_body: request.debug.then_some(body),
        })
    }
}

/// Parses and validates the request URL before any network call.
fn parse_request_url(raw: &str) -> Result<Url, AnalysisError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(AnalysisError::Input(format!(
            "URL exceeds maximum length of {MAX_URL_LENGTH} characters"
        )));
    }
    let parsed = Url::parse(raw).map_err(|e| AnalysisError::Input(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AnalysisError::Input(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(AnalysisError::Input("URL has no host".to_string()));
    }
    Ok(parsed)
}

/// Parses the body once and runs every tree-based extraction.
fn summarize_document(body: &str, page_host: &str) -> DocumentSummary {
    let document = Html::parse_document(body);
    DocumentSummary {
        page_title: extract::extract_title(&document),
        headings: extract::count_headings(&document),
        links: classify_links(&document, page_host),
        has_login_form: login::has_login_form(&document),
    }
}
