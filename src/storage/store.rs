//! The analysis result store.
//!
//! All access to stored results goes through `AnalysisStore`. The central
//! operation is the `(url, owner_id)`-keyed upsert: a single
//! `INSERT ... ON CONFLICT DO UPDATE ... RETURNING` statement, so SQLite's
//! row locking keeps create-or-replace atomic under concurrent analyses of
//! the same pair. `id` and `created_at` survive conflicts; everything else
//! is replaced.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, QueryBuilder, Row, Sqlite};

use crate::models::{AnalysisResult, HeadingCounts, NewAnalysis};

const RESULT_COLUMNS: &str = "id, url, owner_id, html_version, page_title, headings, \
     internal_links, external_links, inaccessible_links, has_login_form, created_at, updated_at";

/// Owner-scoped storage for analysis results.
#[derive(Clone)]
pub struct AnalysisStore {
    pool: Arc<Pool<Sqlite>>,
}

impl AnalysisStore {
    /// Wraps an initialized connection pool.
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// Looks up the stored result for a `(url, owner)` pair.
    pub async fn find_by_url_and_owner(
        &self,
        url: &str,
        owner_id: &str,
    ) -> Result<Option<AnalysisResult>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {RESULT_COLUMNS} FROM analyses WHERE url = ? AND owner_id = ?"
        ))
        .bind(url)
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(row_to_result).transpose()
    }

    /// Looks up one result by id, scoped to `owner_id`.
    ///
    /// Another owner's row is simply not found, mirroring `delete_by_id`.
    pub async fn find_by_id(
        &self,
        id: i64,
        owner_id: &str,
    ) -> Result<Option<AnalysisResult>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {RESULT_COLUMNS} FROM analyses WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(row_to_result).transpose()
    }

    /// Creates or replaces the result for its `(url, owner_id)` pair.
    ///
    /// On conflict the existing row keeps its `id` and `created_at`; all
    /// other columns take the freshly computed values and `updated_at`
    /// advances.
    pub async fn upsert(&self, analysis: &NewAnalysis) -> Result<AnalysisResult, sqlx::Error> {
        let now: DateTime<Utc> = Utc::now();
        let headings_json =
            serde_json::to_string(&analysis.headings).unwrap_or_else(|_| "{}".to_string());
        let inaccessible_json = serde_json::to_string(&analysis.inaccessible_links)
            .unwrap_or_else(|_| "[]".to_string());

        let row = sqlx::query(&format!(
            "INSERT INTO analyses (
                url, owner_id, html_version, page_title, headings,
                internal_links, external_links, inaccessible_links, has_login_form,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (url, owner_id) DO UPDATE SET
                html_version = excluded.html_version,
                page_title = excluded.page_title,
                headings = excluded.headings,
                internal_links = excluded.internal_links,
                external_links = excluded.external_links,
                inaccessible_links = excluded.inaccessible_links,
                has_login_form = excluded.has_login_form,
                updated_at = excluded.updated_at
            RETURNING {RESULT_COLUMNS}"
        ))
        .bind(&analysis.url)
        .bind(&analysis.owner_id)
        .bind(&analysis.html_version)
        .bind(&analysis.page_title)
        .bind(headings_json)
        .bind(analysis.internal_links as i64)
        .bind(analysis.external_links as i64)
        .bind(inaccessible_json)
        .bind(analysis.has_login_form)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        row_to_result(row)
    }

    /// Returns all results owned by `owner_id`, oldest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<AnalysisResult>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {RESULT_COLUMNS} FROM analyses WHERE owner_id = ? ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(row_to_result).collect()
    }

    /// Deletes one result if it exists and belongs to `owner_id`.
    ///
    /// Returns true when a row was removed. The owner check lives in the
    /// WHERE clause, so another owner's row is simply not found.
    pub async fn delete_by_id(&self, id: i64, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM analyses WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes several results at once, still scoped to `owner_id`.
    ///
    /// Returns the number of rows removed; ids the owner does not hold are
    /// skipped rather than treated as an error.
    pub async fn delete_by_ids(&self, ids: &[i64], owner_id: &str) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM analyses WHERE owner_id = ");
        query.push_bind(owner_id);
        query.push(" AND id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        query.push(")");

        let result = query.build().execute(self.pool.as_ref()).await?;
        Ok(result.rows_affected())
    }
}

/// Maps a database row to the domain type.
///
/// The JSON columns are decoded leniently: rows written by older revisions
/// stored `inaccessible_links` as a bare count, which decodes here as an
/// empty list.
fn row_to_result(row: SqliteRow) -> Result<AnalysisResult, sqlx::Error> {
    let headings_json: String = row.try_get("headings")?;
    let headings: HeadingCounts = serde_json::from_str(&headings_json).unwrap_or_else(|e| {
        log::debug!("unreadable headings column, defaulting to zero counts: {e}");
        HeadingCounts::default()
    });

    let inaccessible_json: String = row.try_get("inaccessible_links")?;
    let inaccessible_links: Vec<String> =
        serde_json::from_str(&inaccessible_json).unwrap_or_default();

    Ok(AnalysisResult {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        owner_id: row.try_get("owner_id")?,
        html_version: row.try_get("html_version")?,
        page_title: row.try_get("page_title")?,
        headings,
        internal_links: row.try_get::<i64, _>("internal_links")?.max(0) as u32,
        external_links: row.try_get::<i64, _>("external_links")?.max(0) as u32,
        inaccessible_links,
        has_login_form: row.try_get("has_login_form")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
