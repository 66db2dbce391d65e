//! Domain types shared between the analysis engine and storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-level heading element counts for a page (`<h1>` through `<h6>`).
///
/// Counts are plain element occurrences, independent of nesting or visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)] // field names mirror the heading tags
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Total number of heading elements across all levels.
    pub fn total(&self) -> u32 {
        self.h1 + self.h2 + self.h3 + self.h4 + self.h5 + self.h6
    }
}

/// A stored page analysis, uniquely identified by `(url, owner_id)`.
///
/// `id` and `created_at` are assigned on first creation and survive
/// re-analysis; every other field reflects the most recent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Store-assigned identifier, stable across re-analyses.
    pub id: i64,
    /// The analyzed URL, exactly as submitted.
    pub url: String,
    /// Opaque identity of the caller that owns this result.
    pub owner_id: String,
    /// Canonical HTML version label, or `"Unknown"`.
    pub html_version: String,
    /// Text of the first `<title>` element; empty if absent.
    pub page_title: String,
    /// Per-level heading counts.
    pub headings: HeadingCounts,
    /// Anchors whose href has no hostname or the page's own hostname.
    pub internal_links: u32,
    /// Anchors whose href points at another host.
    pub external_links: u32,
    /// Hrefs that failed the reachability probe, in document order.
    pub inaccessible_links: Vec<String>,
    /// Result of the structural login-form heuristic.
    pub has_login_form: bool,
    /// When this `(url, owner)` pair was first analyzed.
    pub created_at: DateTime<Utc>,
    /// When it was last re-analyzed.
    pub updated_at: DateTime<Utc>,
}

/// Freshly computed analysis fields, not yet reconciled against the store.
#[derive(Debug, Clone)]
#[allow(missing_docs)] // fields mirror AnalysisResult minus the store-assigned ones
pub struct NewAnalysis {
    pub url: String,
    pub owner_id: String,
    pub html_version: String,
    pub page_title: String,
    pub headings: HeadingCounts,
    pub internal_links: u32,
    pub external_links: u32,
    pub inaccessible_links: Vec<String>,
    pub has_login_form: bool,
}

/// The finalized outcome of one analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// The reconciled, stored result.
    pub result: AnalysisResult,
    /// Raw fetched body, present only when the caller requested debug mode.
    pub raw_body: Option<String>,
}
