//! Dashboard screen — score-over-time chart.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::tracker::screen::{Screen, ScreenTransition};
use crate::{ChartSeries, DATE_FORMAT, StatsStore};

/// State for the dashboard screen.
#[derive(Debug, Getters)]
pub struct DashboardScreen {
    series: ChartSeries,
    error_message: Option<String>,
}

impl DashboardScreen {
    /// Creates a new dashboard, loading the chart projection immediately.
    #[instrument(skip(store))]
    pub fn new(store: &StatsStore) -> Self {
        debug!("Initializing DashboardScreen");
        let mut screen = Self {
            series: ChartSeries::default(),
            error_message: None,
        };
        screen.refresh(store);
        screen
    }

    /// Reloads the chart projection from the store.
    #[instrument(skip(self, store))]
    fn refresh(&mut self, store: &StatsStore) {
        match store.list_for_chart() {
            Ok(series) => {
                info!(points = series.len(), "Dashboard refreshed");
                self.series = series;
                self.error_message = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to update dashboard");
                self.error_message = Some(format!("Failed to update dashboard: {}", e.message));
            }
        }
    }

    /// One-line summary shown above the chart.
    #[instrument(skip(self))]
    fn summary(&self) -> String {
        let scores = self.series.scores();
        let best = scores.iter().max().copied().unwrap_or(0);
        let total: i64 = scores.iter().map(|s| i64::from(*s)).sum();
        let average = if scores.is_empty() {
            0.0
        } else {
            total as f64 / scores.len() as f64
        };
        format!(
            "Sessions: {}   Best: {}   Average: {:.1}",
            scores.len(),
            best,
            average
        )
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let points: Vec<(f64, f64)> = self
            .series
            .scores()
            .iter()
            .enumerate()
            .map(|(i, score)| (i as f64, f64::from(*score)))
            .collect();

        let x_labels = date_labels(self.series.dates());

        let max_score = self.series.scores().iter().max().copied().unwrap_or(0).max(1);
        let y_max = f64::from(max_score) * 1.1;
        let x_max = (points.len().saturating_sub(1)).max(1) as f64;

        let dataset = Dataset::default()
            .name("Score")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Gaming Performance Over Time"),
            )
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Score")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, y_max])
                    .labels(vec![
                        "0".to_string(),
                        format!("{}", max_score / 2),
                        format!("{}", max_score),
                    ]),
            );
        frame.render_widget(chart, area);
    }
}

/// X-axis labels: first, middle and last date, each point labelled at most once.
#[instrument(skip(dates), fields(count = dates.len()))]
fn date_labels(dates: &[NaiveDate]) -> Vec<String> {
    let picks: Vec<&NaiveDate> = match dates {
        [] => Vec::new(),
        [only] => vec![only],
        [first, last] => vec![first, last],
        [first, .., last] => vec![first, &dates[dates.len() / 2], last],
    };
    picks
        .into_iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

impl Screen for DashboardScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let (summary_text, summary_style) = match &self.error_message {
            Some(message) => (message.clone(), Style::default().fg(Color::Red)),
            None => (self.summary(), Style::default().fg(Color::Green)),
        };
        let summary = Paragraph::new(summary_text)
            .style(summary_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        frame.render_widget(summary, chunks[0]);

        if self.series.is_empty() {
            let empty = Paragraph::new("No data available")
                .style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Gaming Performance Over Time"),
                );
            frame.render_widget(empty, chunks[1]);
        } else {
            self.render_chart(frame, chunks[1]);
        }

        let help = Paragraph::new("r: Refresh | Tab: Next tab | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, store))]
    fn handle_key(&mut self, key: KeyEvent, store: &StatsStore) -> ScreenTransition {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.refresh(store);
                ScreenTransition::Stay
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
