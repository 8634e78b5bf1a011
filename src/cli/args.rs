//! CLI argument definitions using clap
//!
//! Commands:
//! - fitlog init [--data-dir <path>]
//! - fitlog serve [--data-dir <path>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fitlog - a small, self-hostable exercise log service
#[derive(Parser, Debug)]
#[command(name = "fitlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty journal
    Init {
        /// Data directory (overrides FITLOG_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Start the HTTP server
    Serve {
        /// Data directory (overrides FITLOG_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Port to bind (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
