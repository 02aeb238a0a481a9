use crate::app::App;
use chrono::NaiveDate;
use dayline_core::models::{date_link, format_date, TaskStatus};
use dayline_core::tasks;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const BULLET: &str = "• ";

/// Render the header with title and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" dayline · {} ", app.active_date.format("%a %Y-%m-%d"));

    let key_hints = if app.slash_menu.is_some() {
        " [↑/↓:Select] [Enter:Choose] [←:Back] [Esc:Close] "
    } else if app.task_drawer_open {
        " [↑/↓:Select] [x:Done] [s:Status] [d:Delete] [Esc:Close] "
    } else {
        " [Enter:Split] [Tab/Shift+Tab:Indent] [Shift+↑/↓:Select] [/:Commands] [Alt+↑/↓:Day] [Ctrl+G:Today] [Ctrl+T:Tasks] [Ctrl+Q:Quit] "
    };

    let header_spans = vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(key_hints, Style::default().fg(Color::DarkGray)),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Render every entry, newest first, and place the terminal caret in the
/// focused block
pub fn render_outline(frame: &mut Frame, app: &mut App, area: Rect) {
    let indent_width = app.config.editor.indent_width as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    // (line index, column) of the caret
    let mut caret: Option<(usize, usize)> = None;

    for entry in app.session.journal().newest_first() {
        let is_active = entry.date() == app.active_date;
        lines.push(entry_heading(entry.date(), app.today, is_active));

        for block in entry.blocks() {
            let indent = " ".repeat(block.level * indent_width);
            let is_focused = is_active && app.focused_block.as_deref() == Some(block.id.as_str());

            if is_focused {
                let before: String = block.content.chars().take(app.cursor).collect();
                caret = Some((lines.len(), indent.width() + BULLET.width() + before.width()));
            }

            let mut spans = vec![
                Span::raw(indent),
                Span::styled(BULLET, Style::default().fg(Color::Cyan)),
            ];
            spans.extend(content_spans(&block.content));

            let mut line = Line::from(spans);
            if is_active && app.is_selected(&block.id) {
                line = line.style(Style::default().bg(Color::Rgb(40, 60, 110)));
            } else if is_focused {
                line = line.style(Style::default().bg(Color::Rgb(30, 34, 48)));
            } else if !is_active {
                line = line.style(Style::default().fg(Color::Gray));
            }
            lines.push(line);
        }
        lines.push(Line::from(""));
    }

    // Keep the caret line on screen
    let height = area.height.saturating_sub(2) as usize;
    if let Some((row, _)) = caret {
        if row < app.scroll_offset {
            app.scroll_offset = row.saturating_sub(1);
        } else if height > 0 && row >= app.scroll_offset + height {
            app.scroll_offset = row + 1 - height;
        }
    }

    let outline = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Journal ")
                .title_alignment(Alignment::Left),
        )
        .scroll((app.scroll_offset as u16, 0));

    frame.render_widget(outline, area);

    app.caret_position = caret.and_then(|(row, column)| {
        let visible_row = row.checked_sub(app.scroll_offset)?;
        if visible_row >= height {
            return None;
        }
        let max_x = area.right().saturating_sub(2);
        let x = (area.x as usize + 1 + column).min(max_x as usize) as u16;
        let y = area.y + 1 + visible_row as u16;
        Some((x, y))
    });

    if let Some((x, y)) = app.caret_position {
        frame.set_cursor(x, y);
    }
}

fn entry_heading(date: NaiveDate, today: NaiveDate, is_active: bool) -> Line<'static> {
    let mut text = date.format("%A, %B %-d, %Y").to_string();
    if date == today {
        text.push_str(" · today");
    }

    let style = if is_active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text, style))
}

/// Split block text into plain and `[[link]]` spans
fn content_spans(content: &str) -> Vec<Span<'static>> {
    let link_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::UNDERLINED);
    let mut spans = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("[[") {
        let Some(close) = rest[start..].find("]]") else {
            break;
        };
        let end = start + close + 2;
        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        spans.push(Span::styled(rest[start..end].to_string(), link_style));
        rest = &rest[end..];
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }
    spans
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_text = match &app.status_message {
        Some(message) => format!(" {} ", message),
        None => {
            let rows = app.task_rows();
            let open = rows.iter().filter(|r| !r.task.is_completed()).count();
            format!(
                " {} entries | {} tasks, {} open | {} ",
                app.session.journal().len(),
                rows.len(),
                open,
                format_date(app.today),
            )
        }
    };

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Entries that link to the active date, with the linking blocks
pub fn render_backlinks_panel(frame: &mut Frame, app: &App, area: Rect) {
    let link = date_link(app.active_date);
    let mut lines: Vec<Line> = Vec::new();

    for entry in app.session.backlinks(app.active_date) {
        lines.push(Line::from(Span::styled(
            format_date(entry.date()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for block in entry.blocks().iter().filter(|b| b.links_to(&link)) {
            lines.push(Line::from(format!("  {}", block.content)));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled("No backlinks", Style::default().fg(Color::DarkGray))));
    }
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Backlinks "))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

/// Render the task drawer
pub fn render_task_drawer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tasks ")
        .style(Style::default().fg(Color::Yellow));

    let rows = app.task_rows();
    if rows.is_empty() {
        let para = Paragraph::new("No tasks yet. Type /add in a block.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(para, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let task = row.task;
            let checkbox = match task.status {
                TaskStatus::NotStarted => "[ ]",
                TaskStatus::InProgress => "[~]",
                TaskStatus::Completed => "[x]",
            };

            let mut spans = vec![
                Span::raw("  ".repeat(row.depth)),
                Span::raw(format!("{} {}", checkbox, task.title)),
            ];
            if !task.is_leaf() {
                spans.push(Span::styled(
                    format!(" {}%", tasks::progress(task)),
                    Style::default().fg(Color::Cyan),
                ));
            }
            if let Some(due) = task.due_date {
                let style = if task.is_overdue(app.today) {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                spans.push(Span::styled(format!(" due {}", format_date(due)), style));
            }

            let mut line = Line::from(spans);
            if task.is_completed() {
                line = line.style(Style::default().fg(Color::DarkGray));
            }
            ListItem::new(line)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.task_selection));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the slash menu as a popup anchored under the caret
pub fn render_slash_menu(frame: &mut Frame, app: &App, area: Rect) {
    let Some(menu) = &app.slash_menu else {
        return;
    };
    let commands = menu.stack.current();

    let popup_width = 34.min(area.width);
    let popup_height = (commands.len().clamp(1, 8) as u16 + 2).min(area.height);

    let (caret_x, caret_y) = app.caret_position.unwrap_or((area.x + 2, area.y + 3));
    let x = caret_x.min(area.right().saturating_sub(popup_width));
    let y = if caret_y + 1 + popup_height <= area.bottom() {
        caret_y + 1
    } else {
        caret_y.saturating_sub(popup_height)
    };
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let title = if menu.stack.is_root() {
        format!(" {}{} ", app.config.editor.slash_trigger, menu.query.term)
    } else {
        " ← back ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = commands
        .iter()
        .map(|command| {
            let text = if command.has_sub_commands() {
                format!("{} ›", command.name)
            } else {
                command.name.clone()
            };
            ListItem::new(Line::from(text))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(menu.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(list, popup_area, &mut state);
}
