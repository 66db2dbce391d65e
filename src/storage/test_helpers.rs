//! Shared test helpers for storage module tests.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::models::{HeadingCounts, NewAnalysis};
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution; a single connection,
/// since each SQLite connection would otherwise get its own memory database.
pub async fn create_test_pool() -> Arc<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(pool)
}

/// Builds a plausible analysis for the given key, with fixed content.
pub fn sample_analysis(url: &str, owner_id: &str) -> NewAnalysis {
    NewAnalysis {
        url: url.to_string(),
        owner_id: owner_id.to_string(),
        html_version: "HTML5".to_string(),
        page_title: "Test Page".to_string(),
        headings: HeadingCounts {
            h1: 1,
            h2: 2,
            ..Default::default()
        },
        internal_links: 3,
        external_links: 1,
        inaccessible_links: Vec::new(),
        has_login_form: false,
    }
}
