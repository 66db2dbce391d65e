//! Title and heading extraction from a parsed document.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::analyze::compile_selector;
use crate::models::HeadingCounts;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_selector("title"));

static HEADING_SELECTORS: LazyLock<[Selector; 6]> = LazyLock::new(|| {
    [
        compile_selector("h1"),
        compile_selector("h2"),
        compile_selector("h3"),
        compile_selector("h4"),
        compile_selector("h5"),
        compile_selector("h6"),
    ]
});

/// Extracts the page title from an HTML document.
///
/// Returns the text content of the first `<title>` element, trimmed of
/// whitespace, or an empty string if the document has no title.
pub fn extract_title(document: &Html) -> String {
    match document.select(&TITLE_SELECTOR).next() {
        Some(element) => element.text().collect::<String>().trim().to_string(),
        None => {
            log::debug!("no title element found in document");
            String::new()
        }
    }
}

/// Counts heading elements per level (`h1` through `h6`).
pub fn count_headings(document: &Html) -> HeadingCounts {
    let count = |level: usize| document.select(&HEADING_SELECTORS[level]).count() as u32;
    HeadingCounts {
        h1: count(0),
        h2: count(1),
        h3: count(2),
        h4: count(3),
        h5: count(4),
        h6: count(5),
    }
}
