//! Subscriber construction.
//!
//! The binary builds one [`Dispatch`] and hands it to the store explicitly
//! (see [`StatsStore::with_dispatch`](crate::StatsStore::with_dispatch)).

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Dispatch, instrument};
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Standard error, for one-shot commands.
    Stderr,
    /// A file without ANSI colours, for the terminal dashboard.
    File(PathBuf),
}

/// Builds a subscriber. `RUST_LOG` takes precedence over `default_filter`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
#[instrument]
pub fn build_dispatch(default_filter: &str, sink: &LogSink) -> anyhow::Result<Dispatch> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let dispatch = match sink {
        LogSink::Stderr => Dispatch::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish(),
        ),
        LogSink::File(path) => {
            let log_file = File::create(path)?;
            Dispatch::new(
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(Arc::new(log_file))
                    .with_ansi(false)
                    .finish(),
            )
        }
    };
    Ok(dispatch)
}
