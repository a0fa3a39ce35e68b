//! Command-line interface for anireq.

mod commands;

use clap::{Parser, Subcommand};

/// anireq - community anime request board
#[derive(Parser)]
#[command(name = "anireq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Print the current board
    #[command(alias = "ls", alias = "l")]
    List {
        /// Newest first instead of most voted
        #[arg(long)]
        recent: bool,
    },

    /// Write a default config.toml if none exists
    Init,
}

pub use commands::*;
