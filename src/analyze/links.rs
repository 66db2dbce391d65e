//! Link classification and reachability probing.
//!
//! Classification is a pure pass over the parsed document; probing is the
//! only I/O in the engine besides the primary fetch, and runs as a bounded
//! pool of HEAD requests with a per-probe timeout.

use std::sync::LazyLock;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::analyze::compile_selector;
use crate::error_handling::AnalysisError;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_selector("a[href]"));

/// Result of classifying the anchors of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Anchors whose href has no hostname or the page's own hostname.
    pub internal: u32,
    /// Anchors whose href points at another host.
    pub external: u32,
    /// Hrefs that parse as absolute URLs, in document order. These are the
    /// probe candidates; relative hrefs cannot be probed as given.
    pub probe_targets: Vec<String>,
}

/// Classifies every anchor href as internal or external relative to
/// `page_host`.
///
/// Empty hrefs and pure fragments are skipped entirely, so
/// `internal + external` equals the number of anchors actually classified.
/// Probing policy: every href that parses as an absolute URL is a probe
/// target, regardless of which bucket it landed in.
pub fn classify_links(document: &Html, page_host: &str) -> LinkSummary {
    let mut summary = LinkSummary::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        match Url::parse(href) {
            Ok(absolute) => {
                match absolute.host_str() {
                    Some(host) if host.eq_ignore_ascii_case(page_host) => summary.internal += 1,
                    Some(_) => summary.external += 1,
                    // Absolute URI without a hostname (e.g. mailto:) stays
                    // in the internal bucket and is not probed.
                    None => {
                        summary.internal += 1;
                        continue;
                    }
                }
                summary.probe_targets.push(href.to_string());
            }
            // Relative or scheme-relative href: same site, nothing to probe.
            Err(_) => summary.internal += 1,
        }
    }

    summary
}

/// Probes each target with a HEAD request and returns the hrefs that failed,
/// preserving the input (document) order.
///
/// A probe fails on any transport error, on its individual timeout, or on a
/// response status >= 400. Failures never abort the analysis; cancellation
/// does, abandoning whatever probes are still in flight.
pub async fn probe_links(
    client: &reqwest::Client,
    targets: &[String],
    concurrency: usize,
    probe_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<String>, AnalysisError> {
    // buffered() bounds in-flight probes while yielding results in input
    // order, which keeps inaccessible_links in document order.
    let mut probes = stream::iter(targets)
        .map(|href| {
            let client = client.clone();
            async move { (href, probe_one(&client, href, probe_timeout).await) }
        })
        .buffered(concurrency.max(1));

    let mut inaccessible = Vec::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("link probing cancelled with {} results collected", inaccessible.len());
                return Err(AnalysisError::Cancelled);
            }
            next = probes.next() => match next {
                Some((href, reachable)) => {
                    if !reachable {
                        inaccessible.push(href.clone());
                    }
                }
                None => break,
            }
        }
    }

    Ok(inaccessible)
}

/// Issues one HEAD request; true means reachable.
async fn probe_one(client: &reqwest::Client, href: &str, probe_timeout: Duration) -> bool {
    match tokio::time::timeout(probe_timeout, client.head(href).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            if status.as_u16() >= 400 {
                log::debug!("probe of {href} returned status {status}");
                false
            } else {
                true
            }
        }
        Ok(Err(e)) => {
            log::debug!("probe of {href} failed: {e}");
            false
        }
        Err(_) => {
            log::debug!("probe of {href} timed out after {probe_timeout:?}");
            false
        }
    }
}
