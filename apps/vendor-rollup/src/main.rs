//! # Vendor Rollup
//!
//! Runs the vendor rollup once and exits.
//!
//! ```text
//! $ vendor-rollup
//! Cleaned data uploaded to table: vendor_cleaned (10692 rows)
//! ```
//!
//! Exit status is 0 on success and 1 on any failure; the error is logged.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vendor_rollup::{RollupConfig, RollupError, RunReport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match try_main().await {
        Ok(report) => {
            report.log();
            println!("{}", report.success_message());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let kind = e
                .downcast_ref::<RollupError>()
                .map(RollupError::kind)
                .unwrap_or("internal");
            error!(kind, error = %format!("{:#}", e), "Vendor rollup failed");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> anyhow::Result<RunReport> {
    info!("Starting vendor rollup");

    let config = RollupConfig::load(None).context("loading configuration")?;
    info!(
        database = ?config.database,
        destination = %config.destination(),
        "Configuration loaded"
    );

    let report = vendor_rollup::run(&config)
        .await
        .context("vendor rollup run")?;
    Ok(report)
}
