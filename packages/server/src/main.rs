#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for aquawatch.
//!
//! Reads an optional TOML config, then serves the API over an in-memory
//! report store.

use std::path::PathBuf;
use std::sync::Arc;

use aquawatch_database::MemoryReportStore;
use aquawatch_server::{ServerConfig, run_server};
use clap::Parser;

#[derive(Parser)]
#[command(name = "aquawatch_server", about = "Water-quality report API server")]
struct Cli {
    /// Path to a TOML config file (defaults to `$AQUAWATCH_CONFIG`)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    let store = Arc::new(MemoryReportStore::new());

    run_server(config, store).await?;

    Ok(())
}
