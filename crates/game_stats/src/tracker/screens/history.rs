//! History screen — every record in a table, with edit and delete.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use tracing::{debug, info, instrument, warn};

use crate::tracker::screen::{Screen, ScreenTransition};
use crate::{DATE_FORMAT, StatRecord, StatsStore};

/// State for the history screen.
#[derive(Debug, Getters)]
pub struct HistoryScreen {
    records: Vec<StatRecord>,
    selected: Option<usize>,
    pending_delete: Option<i32>,
    status: Option<String>,
    error_message: Option<String>,
}

impl HistoryScreen {
    /// Creates a new history screen, loading all records immediately.
    #[instrument(skip(store))]
    pub fn new(store: &StatsStore) -> Self {
        debug!("Initializing HistoryScreen");
        let mut screen = Self {
            records: Vec::new(),
            selected: None,
            pending_delete: None,
            status: None,
            error_message: None,
        };
        screen.refresh(store);
        screen
    }

    /// Reloads the table, keeping the selection in range.
    #[instrument(skip(self, store))]
    fn refresh(&mut self, store: &StatsStore) {
        match store.list_records() {
            Ok(records) => {
                info!(count = records.len(), "History refreshed");
                self.records = records;
                self.error_message = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to update history");
                self.error_message = Some(format!("Failed to update history: {}", e.message));
            }
        }
        self.selected = match (self.records.len(), self.selected) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    /// The record under the cursor.
    #[instrument(skip(self))]
    pub fn selected_record(&self) -> Option<&StatRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }

    /// Moves the selection up by one.
    #[instrument(skip(self))]
    fn select_previous(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i > 0 => i - 1,
            _ => self.records.len() - 1,
        };
        self.selected = Some(i);
    }

    /// Moves the selection down by one.
    #[instrument(skip(self))]
    fn select_next(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1) % self.records.len(),
            None => 0,
        };
        self.selected = Some(i);
    }

    /// Deletes the record awaiting confirmation.
    #[instrument(skip(self, store))]
    fn confirm_delete(&mut self, store: &StatsStore) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match store.delete_record(id) {
            Ok(true) => {
                info!(id, "Stat deleted from history");
                self.status = Some("Stat deleted successfully!".to_string());
            }
            Ok(false) => {
                warn!(id, "Stat already gone");
                self.status = Some(format!("Stat {} was already deleted.", id));
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete stat");
                self.error_message = Some(format!("Failed to delete stat: {}", e.message));
                return;
            }
        }
        self.refresh(store);
    }
}

impl Screen for HistoryScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Row::new(
            ["ID", "Game", "Date", "Score", "Comments"]
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .records
            .iter()
            .map(|record| {
                Row::new(vec![
                    Cell::from(record.id().to_string()),
                    Cell::from(record.game_name().as_str()),
                    Cell::from(record.date_played().format(DATE_FORMAT).to_string()),
                    Cell::from(record.score().to_string()),
                    Cell::from(record.comments_text()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("History ({} records)", self.records.len())),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut table_state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, chunks[0], &mut table_state);

        let (message, style) = if let Some(id) = self.pending_delete {
            (
                format!("Are you sure you want to delete stat {}? (y/n)", id),
                Style::default().fg(Color::Yellow),
            )
        } else if let Some(error) = &self.error_message {
            (error.clone(), Style::default().fg(Color::Red))
        } else {
            (
                self.status.clone().unwrap_or_default(),
                Style::default().fg(Color::Green),
            )
        };
        let status = Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[1]);

        let help = Paragraph::new("↑↓: Select | e: Edit | d: Delete | r: Refresh | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &StatsStore) -> ScreenTransition {
        if self.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(store),
                _ => {
                    debug!("Delete cancelled");
                    self.pending_delete = None;
                }
            }
            return ScreenTransition::Stay;
        }

        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenTransition::Stay
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                match self.selected_record().map(|r| *r.id()) {
                    Some(id) => {
                        self.pending_delete = Some(id);
                        self.status = None;
                    }
                    None => {
                        self.error_message = Some("Please select a stat to delete.".to_string());
                    }
                }
                ScreenTransition::Stay
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                match self.selected_record() {
                    Some(record) => ScreenTransition::EditRecord(record.clone()),
                    None => ScreenTransition::Stay,
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh(store);
                ScreenTransition::Stay
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }

    fn captures_text(&self) -> bool {
        self.pending_delete.is_some()
    }
}
