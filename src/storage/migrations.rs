// storage/migrations.rs
// Database migration management

use sqlx::{Pool, Sqlite};

/// Applies the SQL migrations embedded from the `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), anyhow::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
