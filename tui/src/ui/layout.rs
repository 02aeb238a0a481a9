use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{render_backlinks_panel, render_header, render_outline, render_slash_menu, render_status_bar, render_task_drawer};

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.size();

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Drawn last so it sits on top of the outline
    if app.slash_menu.is_some() {
        render_slash_menu(frame, app, size);
    }
}

/// Outline on the left, backlinks and the task drawer on the right
fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Outline
            Constraint::Length(36), // Right column
        ])
        .split(area);

    render_outline(frame, app, main_chunks[0]);

    if app.task_drawer_open {
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35), // Backlinks upper
                Constraint::Percentage(65), // Tasks lower
            ])
            .split(main_chunks[1]);
        render_backlinks_panel(frame, app, right_chunks[0]);
        render_task_drawer(frame, app, right_chunks[1]);
    } else {
        render_backlinks_panel(frame, app, main_chunks[1]);
    }
}
