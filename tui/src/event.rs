use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dayline_core::outline::Direction;
use std::time::Duration;
use crate::app::App;
use crate::config::key_matches;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Terminal resized
    Resize(u16, u16),
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application. Failures are logged and shown
/// in the status bar; the app keeps running.
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if let Err(err) = dispatch_key(key, app) {
        log::error!("Key handling failed: {:#}", err);
        app.status_message = Some(format!("Error: {}", err));
    }
}

fn dispatch_key(key: KeyEvent, app: &mut App) -> Result<()> {
    let keymap = app.config.keymap.clone();

    if key_matches(&keymap.quit, &key) {
        app.quit();
        return Ok(());
    }
    if key_matches(&keymap.toggle_tasks, &key) {
        app.toggle_task_drawer();
        return Ok(());
    }

    // Task drawer takes the keyboard while open
    if app.task_drawer_open {
        return handle_task_drawer_input(key, app);
    }

    if app.slash_menu.is_some() && handle_slash_menu_input(key, app)? {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::SHIFT) && matches!(key.code, KeyCode::Up | KeyCode::Down) {
        let direction = if key.code == KeyCode::Up { Direction::Up } else { Direction::Down };
        app.extend_selection(direction);
        return Ok(());
    }

    if key_matches(&keymap.remove_block, &key) {
        return app.remove_block();
    }
    app.clear_selection();

    if key_matches(&keymap.previous_entry, &key) {
        app.previous_entry();
    } else if key_matches(&keymap.next_entry, &key) {
        app.next_entry();
    } else if key_matches(&keymap.goto_today, &key) {
        app.goto_today()?;
    } else {
        handle_editing_input(key, app)?;
    }
    Ok(())
}

/// Keys the slash menu consumes. Returns false for keys that should
/// reach the editor instead (typing keeps narrowing the menu).
fn handle_slash_menu_input(key: KeyEvent, app: &mut App) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.close_slash_menu(),
        KeyCode::Up => app.slash_up(),
        KeyCode::Down => app.slash_down(),
        KeyCode::Enter | KeyCode::Tab => app.slash_select()?,
        KeyCode::Left => return Ok(app.slash_back()),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Handle key events for the focused block
fn handle_editing_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter if !key.modifiers.contains(KeyModifiers::SHIFT) => app.split()?,
        KeyCode::Tab => app.indent()?,
        KeyCode::BackTab => app.outdent()?,
        KeyCode::Backspace => app.backspace()?,
        KeyCode::Up => app.move_caret(Direction::Up)?,
        KeyCode::Down => app.move_caret(Direction::Down)?,
        KeyCode::Left => app.move_caret(Direction::Left)?,
        KeyCode::Right => app.move_caret(Direction::Right)?,
        KeyCode::Home => app.caret_home(),
        KeyCode::End => app.caret_end(),
        KeyCode::Esc => app.status_message = None,
        KeyCode::Char(c) => {
            // Allow AltGr combinations (CONTROL+ALT) for special characters
            if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                app.insert_char(c)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle key events when the task drawer is open
fn handle_task_drawer_input(key: KeyEvent, app: &mut App) -> Result<()> {
    let keymap = app.config.keymap.clone();
    if key_matches(&keymap.task_toggle, &key) || key.code == KeyCode::Char(' ') {
        return app.task_toggle_selected();
    }
    if key_matches(&keymap.task_cycle_status, &key) {
        return app.task_cycle_selected();
    }
    if key_matches(&keymap.task_delete, &key) {
        return app.task_delete_selected();
    }

    match key.code {
        KeyCode::Esc => app.toggle_task_drawer(),
        KeyCode::Up => app.task_up(),
        KeyCode::Down => app.task_down(),
        _ => {}
    }
    Ok(())
}
