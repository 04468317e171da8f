//! Stat form screen — record a new session or edit an existing one.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::tracker::screen::{Screen, ScreenTransition, Tab};
use crate::{DATE_FORMAT, NewStatRecord, StatRecord, StatsStore};

const FIELD_LABELS: [&str; 4] = ["Game Name", "Date Played (YYYY-MM-DD)", "Score", "Comments"];

/// Whether the form creates a record or replaces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting inserts a new record.
    Add,
    /// Submitting replaces the record with this id.
    Edit(i32),
}

/// State for the stat form screen.
#[derive(Debug, Getters)]
pub struct StatFormScreen {
    mode: FormMode,
    fields: [String; 4],
    focused: usize,
    status: Option<String>,
    error_message: Option<String>,
}

/// Today's date as form input.
#[instrument]
fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

impl StatFormScreen {
    /// Creates an empty form for a new record, dated today.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing StatFormScreen");
        Self {
            mode: FormMode::Add,
            fields: [String::new(), today(), "0".to_string(), String::new()],
            focused: 0,
            status: None,
            error_message: None,
        }
    }

    /// Creates a form pre-filled with an existing record.
    #[instrument(skip(record), fields(id = record.id()))]
    pub fn edit(record: &StatRecord) -> Self {
        debug!("Initializing StatFormScreen in edit mode");
        Self {
            mode: FormMode::Edit(*record.id()),
            fields: [
                record.game_name().clone(),
                record.date_played().format(DATE_FORMAT).to_string(),
                record.score().to_string(),
                record.comments_text().to_string(),
            ],
            focused: 0,
            status: None,
            error_message: None,
        }
    }

    /// Restores the empty form after a successful insert.
    #[instrument(skip(self))]
    fn clear(&mut self) {
        self.fields = [String::new(), today(), "0".to_string(), String::new()];
        self.focused = 0;
    }

    /// Validates the input and writes it to the store.
    #[instrument(skip(self, store))]
    fn submit(&mut self, store: &StatsStore) -> ScreenTransition {
        let [game_name, date_played, score, comments] = &self.fields;
        if game_name.trim().is_empty() {
            self.error_message = Some("Please enter a game name.".to_string());
            return ScreenTransition::Stay;
        }

        let record = match NewStatRecord::parse(game_name, date_played, score, comments) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Form input rejected");
                self.error_message = Some(e.message);
                return ScreenTransition::Stay;
            }
        };

        match self.mode {
            FormMode::Add => match store.add_record(&record) {
                Ok(id) => {
                    info!(id, "Stat saved from form");
                    self.status = Some(format!("Stat saved successfully! (id {})", id));
                    self.error_message = None;
                    self.clear();
                    ScreenTransition::Stay
                }
                Err(e) => {
                    warn!(error = %e, "Failed to save stat");
                    self.error_message = Some(format!("Failed to save stat: {}", e.message));
                    ScreenTransition::Stay
                }
            },
            FormMode::Edit(id) => match store.update_record(id, &record) {
                Ok(true) => {
                    info!(id, "Stat updated from form");
                    ScreenTransition::GoTo(Tab::History)
                }
                Ok(false) => {
                    warn!(id, "Edited stat no longer exists");
                    self.error_message = Some(format!("Stat {} no longer exists.", id));
                    ScreenTransition::Stay
                }
                Err(e) => {
                    warn!(error = %e, "Failed to update stat");
                    self.error_message = Some(format!("Failed to update stat: {}", e.message));
                    ScreenTransition::Stay
                }
            },
        }
    }
}

impl Default for StatFormScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for StatFormScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        for (i, (label, value)) in FIELD_LABELS.iter().zip(&self.fields).enumerate() {
            let style = if i == self.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if i == self.focused { "_" } else { "" };
            let field = Paragraph::new(format!("{}{}", value, cursor))
                .style(style)
                .block(Block::default().borders(Borders::ALL).title(*label));
            frame.render_widget(field, chunks[i]);
        }

        let (message, style) = match (&self.error_message, &self.status) {
            (Some(error), _) => (error.as_str(), Style::default().fg(Color::Red)),
            (None, Some(status)) => (status.as_str(), Style::default().fg(Color::Green)),
            (None, None) => ("", Style::default()),
        };
        let status = Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[4]);

        let help_text = match self.mode {
            FormMode::Add => "↑↓: Field | Enter: Save | Esc: Clear | Tab: Next tab",
            FormMode::Edit(_) => "↑↓: Field | Enter: Save changes | Esc: Cancel",
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &StatsStore) -> ScreenTransition {
        match key.code {
            KeyCode::Char(c) => {
                self.fields[self.focused].push(c);
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.fields[self.focused].pop();
                ScreenTransition::Stay
            }
            KeyCode::Up => {
                self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
                ScreenTransition::Stay
            }
            KeyCode::Enter => self.submit(store),
            KeyCode::Esc => match self.mode {
                FormMode::Add => {
                    self.clear();
                    self.status = None;
                    self.error_message = None;
                    ScreenTransition::Stay
                }
                FormMode::Edit(_) => ScreenTransition::GoTo(Tab::History),
            },
            _ => ScreenTransition::Stay,
        }
    }

    fn captures_text(&self) -> bool {
        true
    }
}
