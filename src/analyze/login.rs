//! Login-form detection heuristic.
//!
//! Structural signals only; JavaScript-rendered login UIs are invisible to
//! this check, so false negatives are expected.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::analyze::compile_selector;

/// Structural login signals, evaluated top-to-bottom with first-match-wins
/// semantics.
const LOGIN_SELECTORS: &[&str] = &[
    "input[type='password']",
    "form[action*='login']",
    "form[action*='signin']",
    "#login-form",
    ".login-form",
];

static COMPILED_LOGIN_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| LOGIN_SELECTORS.iter().map(|s| compile_selector(s)).collect());

/// Returns true if the document matches any of the login-form signals.
pub fn has_login_form(document: &Html) -> bool {
    COMPILED_LOGIN_SELECTORS
        .iter()
        .any(|selector| document.select(selector).next().is_some())
}
