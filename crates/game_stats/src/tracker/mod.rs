//! Terminal dashboard — tabs for the chart, the entry form, history and settings.

mod controller;
mod screen;
mod screens;

pub use controller::TrackerController;
pub use screen::{Screen, ScreenTransition, Tab};
pub use screens::{DashboardScreen, FormMode, HistoryScreen, SettingsScreen, StatFormScreen};

use std::io;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::StatsStore;

/// Takes over the terminal and runs the dashboard until the user quits.
///
/// The terminal is restored even when the event loop fails.
#[instrument(skip(store), fields(db_path = %store.db_path()))]
pub fn run_dashboard(store: StatsStore) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut controller = TrackerController::new(store);
    let result = controller.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Dashboard closed"),
        Err(e) => error!(error = %e, "Dashboard failed"),
    }
    result
}
