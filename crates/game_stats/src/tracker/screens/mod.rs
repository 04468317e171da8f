//! Screen implementations for the dashboard state machine.

mod dashboard;
mod history;
mod settings;
mod stat_form;

pub use dashboard::DashboardScreen;
pub use history::HistoryScreen;
pub use settings::SettingsScreen;
pub use stat_form::{FormMode, StatFormScreen};
