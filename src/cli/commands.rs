//! CLI command implementations
//!
//! `serve` follows a strict boot sequence: resolve configuration, open
//! the store (which replays and verifies the journal), build the
//! tracker, then serve. Any failure surfaces before the listener binds.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{self, Tracker};
use crate::config::Config;
use crate::store::DocumentStore;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parses arguments and dispatches.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Init { data_dir } => init(data_dir),
        Command::Serve { data_dir, port } => serve(data_dir, port),
    }
}

/// Creates the data directory and an empty journal, verifying any
/// existing one replays cleanly.
pub fn init(data_dir: Option<PathBuf>) -> CliResult<()> {
    let config = resolve_config(data_dir, None)?;
    DocumentStore::open(&config.data_dir, &api::collection_specs())?;
    println!("Initialized data directory at {}", config.data_dir.display());
    Ok(())
}

/// Boots the HTTP server.
pub fn serve(data_dir: Option<PathBuf>, port: Option<u16>) -> CliResult<()> {
    let config = resolve_config(data_dir, port)?;
    let store = Arc::new(DocumentStore::open(&config.data_dir, &api::collection_specs())?);
    let tracker = Tracker::new(store);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(api::serve(config, tracker))?;
    Ok(())
}

fn resolve_config(data_dir: Option<PathBuf>, port: Option<u16>) -> CliResult<Config> {
    let mut config = match data_dir {
        Some(dir) => Config::with_data_dir(dir)?,
        None => Config::from_env()?,
    };
    if let Some(port) = port {
        config.port = port;
    }
    Ok(config)
}
