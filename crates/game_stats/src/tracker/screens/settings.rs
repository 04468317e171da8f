//! Settings screen — wipe all data after confirmation.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::StatsStore;
use crate::tracker::screen::{Screen, ScreenTransition};

/// State for the settings screen.
#[derive(Debug, Getters)]
pub struct SettingsScreen {
    db_path: String,
    confirming_reset: bool,
    status: Option<String>,
    error_message: Option<String>,
}

impl SettingsScreen {
    /// Creates a new settings screen for the given store.
    #[instrument(skip(store))]
    pub fn new(store: &StatsStore) -> Self {
        debug!("Initializing SettingsScreen");
        Self {
            db_path: store.db_path().to_string(),
            confirming_reset: false,
            status: None,
            error_message: None,
        }
    }

    /// Runs the destructive reset the user just confirmed.
    #[instrument(skip(self, store))]
    fn reset(&mut self, store: &StatsStore) {
        self.confirming_reset = false;
        match store.reset_all() {
            Ok(()) => {
                info!("Database reset from settings");
                self.status = Some("Database reset successfully!".to_string());
                self.error_message = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to reset database");
                self.error_message = Some(format!("Failed to reset database: {}", e.message));
            }
        }
    }
}

impl Screen for SettingsScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        let database = Paragraph::new(self.db_path.as_str())
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Database file"));
        frame.render_widget(database, chunks[0]);

        let reset = Paragraph::new("r: Reset Database (deletes all stats)")
            .style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(reset, chunks[1]);

        let (message, style) = if self.confirming_reset {
            (
                "Are you sure you want to reset the database? This will delete all stats! (y/n)",
                Style::default().fg(Color::Yellow),
            )
        } else if let Some(error) = &self.error_message {
            (error.as_str(), Style::default().fg(Color::Red))
        } else {
            (
                self.status.as_deref().unwrap_or(""),
                Style::default().fg(Color::Green),
            )
        };
        let status = Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[2]);

        let help = Paragraph::new("r: Reset | Tab: Next tab | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &StatsStore) -> ScreenTransition {
        if self.confirming_reset {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.reset(store),
                _ => {
                    debug!("Reset cancelled");
                    self.confirming_reset = false;
                }
            }
            return ScreenTransition::Stay;
        }

        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.confirming_reset = true;
                self.status = None;
                ScreenTransition::Stay
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }

    fn captures_text(&self) -> bool {
        self.confirming_reset
    }
}
