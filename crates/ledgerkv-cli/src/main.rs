//! `ledgerkv` command-line interface.
//!
//! A thin shell around [`ledgerkv::LogStore`] for poking at a log file from
//! a terminal — not a second implementation of the store.
//!
//! # Quick Start
//!
//! ```bash
//! ledgerkv set ./data.db name hello
//! ledgerkv get ./data.db name
//! ledgerkv delete ./data.db name
//! ledgerkv stats ./data.db
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// ledgerkv - an embeddable, single-writer, append-only key-value store.
#[derive(Parser)]
#[command(name = "ledgerkv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a value for a key, overwriting any previous value.
    Set {
        /// Path to the log file.
        path: String,
        /// Key to write.
        key: String,
        /// Value to write.
        value: String,
    },

    /// Read the current value for a key.
    Get {
        /// Path to the log file.
        path: String,
        /// Key to read.
        key: String,
    },

    /// Remove a key. A no-op if the key is already absent.
    Delete {
        /// Path to the log file.
        path: String,
        /// Key to remove.
        key: String,
    },

    /// Report the number of live keys and the log file's size.
    Stats {
        /// Path to the log file.
        path: String,
    },
}

fn main() -> Result<()> {
    let config = ledgerkv_config::LedgerkvConfig::load()?;
    init_tracing(&config.logging.level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Set { path, key, value } => commands::set(&path, &key, &value),
        Commands::Get { path, key } => commands::get(&path, &key),
        Commands::Delete { path, key } => commands::delete(&path, &key),
        Commands::Stats { path } => commands::stats(&path),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
