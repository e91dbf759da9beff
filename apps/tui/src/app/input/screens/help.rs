use crate::app::state::App;
use crossterm::event::KeyCode;

/// F1 and '?' open or close the help overlay; Esc closes it.
pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::F(1) | KeyCode::Char('?') => {
            app.show_help = !app.show_help;
            true
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            true
        }
        _ => false,
    }
}
