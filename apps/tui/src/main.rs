mod api;
mod app;
mod cli;
mod config;
mod domain;
mod event;
mod terminal;
mod ui;

use app::state::RequestParameters;
use app::{App, AppActions};
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    // Initialize application state
    let mut app = App::with_params(RequestParameters::new(args.points, args.days));
    let mut actions = AppActions::new();
    actions.initialize()?;

    // Headless when asked for, or when stdout is not a terminal
    if args.headless || !is_terminal() {
        return event::run_headless(&mut app, &actions, args.json).await;
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, &actions).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
