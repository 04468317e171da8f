//! Game Stats - a personal gaming statistics tracker.
//!
//! Play sessions (game, date, score, comments) are kept in a single SQLite
//! table. [`StatsStore`] owns that table; the command-line front end and the
//! terminal dashboard are thin consumers of it.
//!
//! # Example
//!
//! ```no_run
//! use game_stats::{NewStatRecord, StatsStore, parse_date};
//!
//! # fn example() -> Result<(), game_stats::StoreError> {
//! let store = StatsStore::open("gamestats.db")?;
//! let date = parse_date("2024-01-15")?;
//! let id = store.add_record(&NewStatRecord::new(
//!     "Chess".to_string(),
//!     date,
//!     10,
//!     "first game".to_string(),
//! ))?;
//! assert!(store.delete_record(id)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod logging;
mod tracker;

// Crate-level exports - Persistence
pub use db::{
    ChartSeries, DATE_FORMAT, NewStatRecord, StatRecord, StatsStore, StoreError, StoreErrorKind,
    parse_date,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, TrackerConfig};

// Crate-level exports - Logging
pub use logging::{LogSink, build_dispatch};

// Crate-level exports - Terminal dashboard
pub use tracker::{
    DashboardScreen, FormMode, HistoryScreen, Screen, ScreenTransition, SettingsScreen,
    StatFormScreen, Tab, TrackerController, run_dashboard,
};
