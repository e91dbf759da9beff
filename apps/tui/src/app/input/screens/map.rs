use crate::app::input::screens::handle_shared_input;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    if handle_shared_input(app, key) {
        return;
    }

    match key {
        KeyCode::Up => app.select_prev_point(),
        KeyCode::Down => app.select_next_point(),
        KeyCode::Char('h') => app.toggle_heat_layer(),
        KeyCode::Esc => app.selected_point = None,
        _ => {}
    }
}
