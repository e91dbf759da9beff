use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod dashboard;
mod help;
mod map;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // Help swallows every other key while open
    if app.show_help {
        return;
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::Dashboard => dashboard::handle_dashboard_input(app, key),
    }
}

/// Keys with the same meaning on every screen: quit, refresh, export,
/// banner dismissal, zone filter, parameter steps and screen switching.
pub(crate) fn handle_shared_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('r') | KeyCode::F(5) | KeyCode::Enter => app.request_refresh(),
        KeyCode::Char('e') => app.request_export(),
        KeyCode::Char('x') => app.dismiss_error(),
        KeyCode::Char('z') => app.cycle_zone_filter(),
        KeyCode::Char('+' | '=') => app.params.increase_points(),
        KeyCode::Char('-') => app.params.decrease_points(),
        KeyCode::Char(']') => app.params.widen_days(),
        KeyCode::Char('[') => app.params.narrow_days(),
        KeyCode::Tab => {
            app.screen = match app.screen {
                AppScreen::Map => AppScreen::Dashboard,
                AppScreen::Dashboard => AppScreen::Map,
            };
        }
        KeyCode::Char('1') => app.screen = AppScreen::Map,
        KeyCode::Char('2') => app.screen = AppScreen::Dashboard,
        _ => return false,
    }

    true
}
