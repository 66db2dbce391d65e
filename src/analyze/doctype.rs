//! HTML version sniffing from the document type declaration.
//!
//! The sniffer scans the raw page text for the first `<!doctype ...>`
//! declaration and maps it to a canonical version label. It never fails:
//! a missing or unrecognized declaration resolves to `"Unknown"`.

/// Label returned when no doctype is present or the declaration is
/// unrecognized.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Label for the bare `<!doctype html>` declaration.
pub const HTML5_VERSION: &str = "HTML5";

/// Ordered doctype identifier patterns, most specific first.
///
/// Evaluation order is a correctness requirement: "html 4.01 transitional"
/// must be tested before "html 4.01", and "html 4.01" before "html 4.0",
/// otherwise the more general pattern shadows the specific one.
const DOCTYPE_PATTERNS: &[(&str, &str)] = &[
    ("xhtml 1.0 strict", "XHTML 1.0 Strict"),
    ("xhtml 1.0 transitional", "XHTML 1.0 Transitional"),
    ("xhtml 1.0 frameset", "XHTML 1.0 Frameset"),
    ("xhtml 1.1", "XHTML 1.1"),
    ("html 4.01 transitional", "HTML 4.01 Transitional"),
    ("html 4.01 frameset", "HTML 4.01 Frameset"),
    ("html 4.01", "HTML 4.01"),
    ("html 4.0", "HTML 4.0"),
    ("html 3.2", "HTML 3.2"),
    ("html 2.0", "HTML 2.0"),
];

/// Maps the page's doctype declaration to a canonical HTML version label.
///
/// The bare declaration `html` is HTML5; everything else is matched against
/// the ordered pattern table with first-match-wins semantics.
pub fn sniff_html_version(html: &str) -> &'static str {
    let Some(declaration) = first_doctype(html) else {
        return UNKNOWN_VERSION;
    };

    let declaration = declaration.to_lowercase();
    let declaration = declaration.trim();
    if declaration == "html" {
        return HTML5_VERSION;
    }

    for (pattern, label) in DOCTYPE_PATTERNS {
        if declaration.contains(pattern) {
            return label;
        }
    }

    UNKNOWN_VERSION
}

/// Returns the text inside the first `<!doctype ...>` declaration, or `None`
/// if the page has no complete declaration.
///
/// `<!-- ... -->` spans are skipped first; a commented-out declaration is
/// not a declaration.
fn first_doctype(html: &str) -> Option<&str> {
    // Doctype keywords are ASCII, so lowercasing preserves byte offsets.
    let lowered = html.to_ascii_lowercase();
    let mut pos = 0;
    loop {
        let comment = lowered[pos..].find("<!--").map(|i| pos + i);
        let doctype = lowered[pos..].find("<!doctype").map(|i| pos + i);
        match (comment, doctype) {
            (Some(c), Some(d)) if c < d => {
                let close = lowered[c + "<!--".len()..].find("-->")?;
                pos = c + "<!--".len() + close + "-->".len();
            }
            (_, Some(d)) => {
                let rest = &html[d + "<!doctype".len()..];
                let end = rest.find('>')?;
                return Some(&rest[..end]);
            }
            (_, None) => return None,
        }
    }
}
