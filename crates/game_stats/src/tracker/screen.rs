//! Screen trait, tabs and transition type for the dashboard state machine.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::instrument;

use crate::{StatRecord, StatsStore};

/// Top-level tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Tab {
    /// Score-over-time chart.
    #[strum(to_string = "Dashboard")]
    Dashboard,
    /// Form for recording a new session.
    #[strum(to_string = "Add Stat")]
    AddStat,
    /// Table of every record.
    #[strum(to_string = "History")]
    History,
    /// Destructive maintenance actions.
    #[strum(to_string = "Settings")]
    Settings,
}

impl Tab {
    /// Position of this tab in the tab bar.
    #[instrument]
    pub fn index(self) -> usize {
        Self::iter().position(|tab| tab == self).unwrap_or(0)
    }

    /// The tab to the right, wrapping around.
    #[instrument]
    pub fn next(self) -> Self {
        let tabs: Vec<Self> = Self::iter().collect();
        tabs[(self.index() + 1) % tabs.len()]
    }

    /// The tab to the left, wrapping around.
    #[instrument]
    pub fn previous(self) -> Self {
        let tabs: Vec<Self> = Self::iter().collect();
        tabs[(self.index() + tabs.len() - 1) % tabs.len()]
    }
}

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`TrackerController`](crate::TrackerController) state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen — no state change.
    Stay,
    /// Switch to a tab, reloading its data.
    GoTo(Tab),
    /// Open the stat form pre-filled with an existing record.
    EditRecord(StatRecord),
    /// Exit the dashboard cleanly.
    Quit,
}

/// Trait implemented by each screen in the dashboard state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
/// The controller calls these methods in the event loop.
pub trait Screen {
    /// Renders the screen into `area` of the provided [`Frame`].
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent, store: &StatsStore) -> ScreenTransition;

    /// True while printable keys are consumed as text input.
    fn captures_text(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_order_wraps() {
        assert_eq!(Tab::Dashboard.index(), 0);
        assert_eq!(Tab::Settings.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.previous(), Tab::Settings);
        assert_eq!(Tab::AddStat.to_string(), "Add Stat");
    }
}
