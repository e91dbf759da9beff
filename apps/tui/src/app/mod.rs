// App module for uhi_scope-tui
// Handles application state and business logic

pub mod actions;
pub mod input;
pub mod state;

pub use actions::AppActions;
pub use input::handle_input;
pub use state::{App, AppScreen, FetchPhase, Lifecycle, RequestParameters};
