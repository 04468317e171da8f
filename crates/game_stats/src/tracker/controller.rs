//! Tracker controller — the state machine driving the tabbed dashboard.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Tabs},
};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use crate::StatsStore;
use crate::tracker::screen::{Screen, ScreenTransition, Tab};
use crate::tracker::screens::{DashboardScreen, HistoryScreen, SettingsScreen, StatFormScreen};

/// Active screen in the dashboard state machine.
#[derive(Debug)]
enum ActiveScreen {
    Dashboard(DashboardScreen),
    StatForm(StatFormScreen),
    History(HistoryScreen),
    Settings(SettingsScreen),
}

impl ActiveScreen {
    /// Builds a freshly loaded screen for `tab`.
    #[instrument(skip(store))]
    fn open(tab: Tab, store: &StatsStore) -> Self {
        match tab {
            Tab::Dashboard => Self::Dashboard(DashboardScreen::new(store)),
            Tab::AddStat => Self::StatForm(StatFormScreen::new()),
            Tab::History => Self::History(HistoryScreen::new(store)),
            Tab::Settings => Self::Settings(SettingsScreen::new(store)),
        }
    }

    fn tab(&self) -> Tab {
        match self {
            Self::Dashboard(_) => Tab::Dashboard,
            Self::StatForm(_) => Tab::AddStat,
            Self::History(_) => Tab::History,
            Self::Settings(_) => Tab::Settings,
        }
    }

    fn screen(&self) -> &dyn Screen {
        match self {
            Self::Dashboard(s) => s,
            Self::StatForm(s) => s,
            Self::History(s) => s,
            Self::Settings(s) => s,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::Dashboard(s) => s,
            Self::StatForm(s) => s,
            Self::History(s) => s,
            Self::Settings(s) => s,
        }
    }
}

/// Controller that drives the dashboard state machine.
///
/// Call [`TrackerController::run`] to start the event loop, or feed keys
/// through [`TrackerController::handle_key`] directly.
#[derive(Debug)]
pub struct TrackerController {
    store: StatsStore,
    screen: ActiveScreen,
}

impl TrackerController {
    /// Creates a new controller showing the dashboard.
    #[instrument(skip(store))]
    pub fn new(store: StatsStore) -> Self {
        info!("Creating TrackerController");
        let screen = ActiveScreen::open(Tab::Dashboard, &store);
        Self { store, screen }
    }

    /// The tab currently shown.
    pub fn active_tab(&self) -> Tab {
        self.screen.tab()
    }

    /// The store backing every screen.
    pub fn store(&self) -> &StatsStore {
        &self.store
    }

    /// Handles one key press. Returns `false` when the user asked to quit.
    #[instrument(skip(self), fields(tab = %self.active_tab()))]
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            info!("Ctrl-C pressed");
            return false;
        }

        let transition = match key.code {
            KeyCode::Tab => ScreenTransition::GoTo(self.active_tab().next()),
            KeyCode::BackTab => ScreenTransition::GoTo(self.active_tab().previous()),
            KeyCode::Char('q') | KeyCode::Char('Q') if !self.screen.screen().captures_text() => {
                ScreenTransition::Quit
            }
            _ => self.screen.screen_mut().handle_key(key, &self.store),
        };

        self.apply_transition(transition)
    }

    /// Applies a screen transition. Returns `false` to quit.
    #[instrument(skip(self))]
    fn apply_transition(&mut self, transition: ScreenTransition) -> bool {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => true,
            ScreenTransition::GoTo(tab) => {
                info!(tab = %tab, "Navigating to tab");
                self.screen = ActiveScreen::open(tab, &self.store);
                true
            }
            ScreenTransition::EditRecord(record) => {
                info!(id = record.id(), "Editing stat");
                self.screen = ActiveScreen::StatForm(StatFormScreen::edit(&record));
                true
            }
            ScreenTransition::Quit => false,
        }
    }

    /// Draws the tab bar and the active screen.
    #[instrument(skip(self, frame))]
    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        let tabs = Tabs::new(Tab::iter().map(|tab| tab.to_string()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Gaming Stats Tracker"),
            )
            .select(self.active_tab().index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        self.screen.screen().render(frame, chunks[1]);
    }

    /// Runs the event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting dashboard event loop");
        loop {
            terminal.draw(|f| self.draw(f))?;

            // Poll with a timeout so resizes are redrawn promptly.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if !self.handle_key(key) {
                    info!("Dashboard quitting");
                    return Ok(());
                }
            }
        }
    }
}
