// UI module for uhi_scope-tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::{App, AppActions};
use ratatui::Frame;

pub fn ui(app: &App, actions: &AppActions, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Map => screens::map::render_map_view(app, actions, f),
        AppScreen::Dashboard => screens::dashboard::render_dashboard_view(app, f),
    }

    if app.show_help {
        screens::help::render_help(f);
    }

    // The banner sits above whatever screen is active
    if let Some(message) = &app.error {
        widgets::popup::render_error_banner(message, f);
    }
}
