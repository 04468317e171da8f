//! Database persistence layer for play-session statistics.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{StoreError, StoreErrorKind};
pub use models::{ChartSeries, DATE_FORMAT, NewStatRecord, StatRecord, parse_date};
pub use repository::StatsStore;
