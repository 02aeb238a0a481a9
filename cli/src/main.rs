mod cli;
mod logging;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dayline_core::storage::{SnapshotStore, SqliteSnapshotStore};
use dayline_core::Session;
use dayline_tui::{load_config, App, EventHandler};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = logging::init_logging(&args.log_level, &args.log_dir())?;

    // Everything that can fail on startup happens before the terminal is taken over
    let config = load_config(&args.config_path())?;
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let store: Box<dyn SnapshotStore> = Box::new(SqliteSnapshotStore::open(&args.db)?);
    let session = Session::open(store, today)?;
    info!("Opened {} for {}", args.db.display(), today);

    let mut app = App::new(session, config, today);
    let event_handler = EventHandler::new(app.config.editor.tick_rate_ms);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("Exited with error: {:#}", err);
        eprintln!("Error: {:?}", err);
    }
    info!("dayline stopped");

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| dayline_tui::ui::render(f, app))?;

        match event_handler.next()? {
            dayline_tui::Event::Key(key) => {
                dayline_tui::event::handle_key_event(key, app);
            }
            dayline_tui::Event::Resize(_, _) => {
                terminal.autoresize()?;
            }
            dayline_tui::Event::Tick => {
                app.tick()?;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
