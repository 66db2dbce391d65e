//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `page_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use page_audit::config::ANALYSIS_DEADLINE;
use page_audit::initialization::{init_client, init_logger_with, init_probe_client};
use page_audit::storage::{init_db_pool_with_path, run_migrations, AnalysisStore};
use page_audit::{AnalysisRequest, Analyzer, AnalyzerOptions, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists). This allows
    // setting PAGE_AUDIT_OWNER without exporting it manually.
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(config).await {
        eprintln!("page_audit error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let store = AnalysisStore::new(pool);

    match &config.command {
        Command::Analyze { url, debug } => {
            let client = init_client(&config).context("Failed to initialize HTTP client")?;
            let probe_client =
                init_probe_client(&config).context("Failed to initialize probe client")?;
            let analyzer = Analyzer::new(
                client,
                probe_client,
                store,
                AnalyzerOptions {
                    probe_concurrency: config.probe_concurrency,
                    probe_timeout: std::time::Duration::from_secs(config.probe_timeout_seconds),
                },
            );

            // One cancellation token covers the overall deadline and Ctrl-C;
            // a cancelled analysis persists nothing.
            let cancel = CancellationToken::new();
            let deadline_cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(ANALYSIS_DEADLINE).await;
                deadline_cancel.cancel();
            });
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("interrupt received, abandoning analysis");
                    signal_cancel.cancel();
                }
            });

            let outcome = analyzer
                .analyze(
                    &AnalysisRequest {
                        url: url.clone(),
                        owner_id: config.owner.clone(),
                        debug: *debug,
                    },
                    &cancel,
                )
                .await
                .with_context(|| format!("Failed to analyze {url}"))?;

            println!("{}", serde_json::to_string_pretty(&outcome.result)?);
            if let Some(raw) = outcome.raw_body {
                println!("--- raw body ({} bytes) ---", raw.len());
                println!("{raw}");
            }
        }
        Command::Get { id } => {
            let result = store
                .find_by_id(*id, &config.owner)
                .await
                .context("Failed to fetch analysis")?;
            match result {
                Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                None => anyhow::bail!("no analysis with id {id} for this owner"),
            }
        }
        Command::List => {
            let results = store
                .list_by_owner(&config.owner)
                .await
                .context("Failed to list analyses")?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Delete { ids } => {
            let removed = store
                .delete_by_ids(ids, &config.owner)
                .await
                .context("Failed to delete analyses")?;
            println!(
                "Deleted {removed} analysis record{}",
                if removed == 1 { "" } else { "s" }
            );
        }
    }

    Ok(())
}
