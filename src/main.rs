//! infra-console - access-management console
//!
//! Command-line front end for the session gate and the grant editor

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use infra_console::utils::logging::init_logging;
use infra_console::{Cli, ConsoleConfig, build_info};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

const DEFAULT_CONFIG: &str = "config/console.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // {:#} keeps the whole context chain on one line
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => ConsoleConfig::from_file(DEFAULT_CONFIG)
            .await
            .with_context(|| format!("loading {}", DEFAULT_CONFIG))?,
        None => ConsoleConfig::default(),
    };

    config
        .apply_env_overrides(|key| std::env::var(key).ok())
        .context("reading INFRA_* environment")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(config.logging.level, config.logging.json)?;

    let info = build_info();
    debug!(
        "infra-console {} ({}, built {})",
        info.version, info.git_hash, info.build_time
    );

    cli.run(config).await?;
    Ok(())
}
