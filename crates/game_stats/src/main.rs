//! Game Stats - Unified CLI
//!
//! Records play sessions and shows score trends, from the shell or a
//! terminal dashboard.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Command};
use game_stats::{
    DATE_FORMAT, LogSink, NewStatRecord, StatsStore, TrackerConfig, build_dispatch, run_dashboard,
};
use tracing::{info, instrument, warn};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = TrackerConfig::load_or_default(&cli.config)?;
    if let Some(db_path) = cli.db_path.clone() {
        config = config.with_db_path(db_path);
    }

    let sink = match cli.command {
        Command::Tui => LogSink::File(config.log_file().clone()),
        _ => LogSink::Stderr,
    };
    let dispatch = build_dispatch(config.log_filter(), &sink)?;
    tracing::dispatcher::set_global_default(dispatch.clone())?;

    info!(db_path = %config.db_path(), command = ?cli.command, "Starting game_stats");
    let store = StatsStore::new(config.db_path()).with_dispatch(dispatch);

    match cli.command {
        Command::Init => run_init(&store),
        Command::Reset { yes } => run_reset(&store, yes),
        Command::Add {
            game,
            score,
            date,
            comments,
        } => run_add(&store, game, score, date, comments),
        Command::List { json } => run_list(&store, json),
        Command::Update {
            id,
            game,
            score,
            date,
            comments,
        } => run_update(&store, id, NewStatRecord::new(game, date, score, comments)),
        Command::Delete { id } => run_delete(&store, id),
        Command::Chart { json } => run_chart(&store, json),
        Command::Tui => {
            store.ensure_schema()?;
            run_dashboard(store)
        }
    }
}

/// Create the table if needed
#[instrument(skip(store))]
fn run_init(store: &StatsStore) -> Result<()> {
    store.ensure_schema()?;
    println!("Database ready at {}", store.db_path());
    Ok(())
}

/// Wipe every record
#[instrument(skip(store))]
fn run_reset(store: &StatsStore, yes: bool) -> Result<()> {
    if !yes {
        warn!("Reset refused without confirmation");
        bail!("refusing to delete all stats without --yes");
    }
    store.ensure_schema()?;
    store.reset_all()?;
    println!("Database reset successfully");
    Ok(())
}

/// Record a new session
#[instrument(skip(store, comments))]
fn run_add(
    store: &StatsStore,
    game: String,
    score: i32,
    date: Option<NaiveDate>,
    comments: String,
) -> Result<()> {
    store.ensure_schema()?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let id = store.add_record(&NewStatRecord::new(game, date, score, comments))?;
    println!("Added stat {}", id);
    Ok(())
}

/// Print every record, most recent first
#[instrument(skip(store))]
fn run_list(store: &StatsStore, json: bool) -> Result<()> {
    store.ensure_schema()?;
    let records = store.list_records()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No stats recorded yet");
        return Ok(());
    }

    println!(
        "{:>5}  {:<24}  {:<10}  {:>7}  Comments",
        "ID", "Game", "Date", "Score"
    );
    for record in &records {
        println!(
            "{:>5}  {:<24}  {:<10}  {:>7}  {}",
            record.id(),
            record.game_name(),
            record.date_played().format(DATE_FORMAT),
            record.score(),
            record.comments_text()
        );
    }
    Ok(())
}

/// Replace an existing record
#[instrument(skip(store, record))]
fn run_update(store: &StatsStore, id: i32, record: NewStatRecord) -> Result<()> {
    store.ensure_schema()?;
    if store.update_record(id, &record)? {
        println!("Updated stat {}", id);
        Ok(())
    } else {
        bail!("no stat with id {}", id)
    }
}

/// Remove a record
#[instrument(skip(store))]
fn run_delete(store: &StatsStore, id: i32) -> Result<()> {
    store.ensure_schema()?;
    if store.delete_record(id)? {
        println!("Deleted stat {}", id);
        Ok(())
    } else {
        bail!("no stat with id {}", id)
    }
}

/// Print the chart projection, oldest first
#[instrument(skip(store))]
fn run_chart(store: &StatsStore, json: bool) -> Result<()> {
    store.ensure_schema()?;
    let series = store.list_for_chart()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    if series.is_empty() {
        println!("No data available");
        return Ok(());
    }

    for (game, date, score) in series.points() {
        println!("{}  {:>7}  {}", date.format(DATE_FORMAT), score, game);
    }
    Ok(())
}
