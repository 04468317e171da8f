//! Command-line interface for game_stats.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Game Stats - record play sessions and watch your scores over time
#[derive(Parser, Debug)]
#[command(name = "game_stats")]
#[command(about = "Personal gaming statistics tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "game_stats.toml")]
    pub config: PathBuf,

    /// Database file, overriding the configured path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the stats table if it does not exist
    Init,

    /// Delete every record and recreate the table
    Reset {
        /// Confirm that all data should be deleted
        #[arg(long)]
        yes: bool,
    },

    /// Record a play session
    Add {
        /// Name of the game
        game: String,

        /// Score achieved (non-negative)
        #[arg(short, long, allow_negative_numbers = true)]
        score: i32,

        /// Date played as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Free-form comments
        #[arg(short, long, default_value = "")]
        comments: String,
    },

    /// List all records, most recent first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace every field of an existing record
    Update {
        /// Record id
        id: i32,

        /// Name of the game
        game: String,

        /// Score achieved (non-negative)
        #[arg(short, long, allow_negative_numbers = true)]
        score: i32,

        /// Date played as YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        /// Free-form comments
        #[arg(short, long, default_value = "")]
        comments: String,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: i32,
    },

    /// Print scores over time, oldest first
    Chart {
        /// Print JSON instead of plain lines
        #[arg(long)]
        json: bool,
    },

    /// Run the terminal dashboard
    Tui,
}
