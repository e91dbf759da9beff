use crate::app::input::screens::handle_shared_input;
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    if handle_shared_input(app, key) {
        return;
    }

    match key {
        KeyCode::Up => app.select_prev_point(),
        KeyCode::Down => app.select_next_point(),
        KeyCode::Esc => app.screen = AppScreen::Map,
        _ => {}
    }
}
