use anyhow::Result;
use chrono::{Local, NaiveDate};
use dayline_core::{
    models::{date_link, format_date, CommandAction, DailyEntry, SlashCommand, TaskNode, TaskStatus},
    outline::{self, Caret, Direction, FocusTarget, OutlineCommand, Outcome},
    slash::{self, CatalogStack, Navigation, SlashQuery},
    storage::SnapshotStore,
    tasks::{self, TaskCommand},
    Session,
};
use log::info;
use crate::config::Config;

/// Session type the terminal app runs on
pub type JournalSession = Session<Box<dyn SnapshotStore>>;

/// An open slash menu over the focused block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashMenu {
    pub block_id: String,
    pub query: SlashQuery,
    pub stack: CatalogStack,
    pub selected: usize,
}

/// One visible line of the task drawer
#[derive(Debug, Clone, Copy)]
pub struct TaskRow<'a> {
    pub depth: usize,
    pub task: &'a TaskNode,
}

/// Application state
pub struct App {
    pub should_quit: bool,
    pub session: JournalSession,
    pub config: Config,
    pub catalog: Vec<SlashCommand>,
    pub today: NaiveDate,
    pub active_date: NaiveDate,
    pub focused_block: Option<String>,
    /// Caret position in characters within the focused block
    pub cursor: usize,
    /// Block where a Shift+arrow selection started
    pub selection_anchor: Option<String>,
    /// Ids of the selected blocks in the active entry, in outline order
    pub selected_blocks: Vec<String>,
    pub scroll_offset: usize,
    pub slash_menu: Option<SlashMenu>,
    /// Screen cell of the caret from the last draw, used to anchor popups
    pub caret_position: Option<(u16, u16)>,
    pub task_drawer_open: bool,
    pub task_selection: usize,
    pub status_message: Option<String>,
}

impl App {
    /// Create the app over an opened session, focused on today's first block
    pub fn new(session: JournalSession, config: Config, today: NaiveDate) -> Self {
        let status_message = if session.load_errors().is_empty() {
            None
        } else {
            Some(format!("Could not load saved data: {}", session.load_errors().join("; ")))
        };
        let focused_block = session.entry(today).map(|e| e.first_block().id.clone());

        Self {
            should_quit: false,
            session,
            config,
            catalog: slash::default_catalog(),
            today,
            active_date: today,
            focused_block,
            cursor: 0,
            selection_anchor: None,
            selected_blocks: Vec::new(),
            scroll_offset: 0,
            slash_menu: None,
            caret_position: None,
            task_drawer_open: false,
            task_selection: 0,
            status_message,
        }
    }

    pub fn active_entry(&self) -> Option<&DailyEntry> {
        self.session.entry(self.active_date)
    }

    /// Text of the focused block, empty if nothing is focused
    pub fn focused_content(&self) -> &str {
        self.focused_block
            .as_deref()
            .and_then(|id| self.active_entry()?.block(id))
            .map(|b| b.content.as_str())
            .unwrap_or("")
    }

    fn focused_len(&self) -> usize {
        self.focused_content().chars().count()
    }

    fn apply_focus(&mut self, target: &FocusTarget) {
        let len = self
            .active_entry()
            .and_then(|e| e.block(&target.block_id))
            .map_or(0, |b| b.char_len());
        self.cursor = match target.caret {
            Caret::Start => 0,
            Caret::End => len,
            Caret::At(n) => n.min(len),
            Caret::Preserve => self.cursor.min(len),
        };
        self.focused_block = Some(target.block_id.clone());
    }

    /// Send a command for the active entry. Returns whether it was accepted.
    fn run_outline(&mut self, command: OutlineCommand) -> Result<bool> {
        let Some(outcome) = self.session.dispatch_outline(self.active_date, &command)? else {
            return Ok(false);
        };

        match outcome {
            Outcome::Edited(edit) => {
                if let Some(focus) = edit.focus {
                    self.apply_focus(&focus);
                }
            }
            Outcome::Focus(focus) => self.apply_focus(&focus),
        }
        self.cursor = self.cursor.min(self.focused_len());
        Ok(true)
    }

    fn set_focused_content(&mut self, content: String) -> Result<bool> {
        let Some(block_id) = self.focused_block.clone() else {
            return Ok(false);
        };
        self.run_outline(OutlineCommand::SetContent { block_id, content })
    }

    // =========================
    // Editing
    // =========================

    pub fn insert_char(&mut self, ch: char) -> Result<()> {
        let mut chars: Vec<char> = self.focused_content().chars().collect();
        let at = self.cursor.min(chars.len());
        chars.insert(at, ch);

        if self.set_focused_content(chars.into_iter().collect())? {
            self.cursor = at + 1;
        }
        self.refresh_slash_menu();
        Ok(())
    }

    /// Delete the character before the caret. On an empty block this merges
    /// it into the previous one.
    pub fn backspace(&mut self) -> Result<()> {
        let Some(block_id) = self.focused_block.clone() else {
            return Ok(());
        };

        if self.cursor == 0 {
            if self.focused_content().is_empty() {
                self.run_outline(OutlineCommand::MergeWithPrevious { block_id })?;
            }
        } else {
            let mut chars: Vec<char> = self.focused_content().chars().collect();
            let at = self.cursor.min(chars.len());
            if at > 0 {
                chars.remove(at - 1);
                if self.set_focused_content(chars.into_iter().collect())? {
                    self.cursor = at - 1;
                }
            }
        }
        self.refresh_slash_menu();
        Ok(())
    }

    pub fn split(&mut self) -> Result<()> {
        let Some(block_id) = self.focused_block.clone() else {
            return Ok(());
        };
        self.slash_menu = None;
        self.run_outline(OutlineCommand::Split {
            block_id,
            cursor: self.cursor,
        })?;
        Ok(())
    }

    pub fn indent(&mut self) -> Result<()> {
        if let Some(block_id) = self.focused_block.clone() {
            self.run_outline(OutlineCommand::Indent { block_id })?;
        }
        Ok(())
    }

    pub fn outdent(&mut self) -> Result<()> {
        if let Some(block_id) = self.focused_block.clone() {
            self.run_outline(OutlineCommand::Outdent { block_id })?;
        }
        Ok(())
    }

    /// Remove the selected blocks, or the focused one when nothing is selected
    pub fn remove_block(&mut self) -> Result<()> {
        self.slash_menu = None;
        let targets = if self.selected_blocks.is_empty() {
            self.focused_block.clone().into_iter().collect()
        } else {
            std::mem::take(&mut self.selected_blocks)
        };
        self.selection_anchor = None;

        // Last first, so focus ends up just before the removed run
        for block_id in targets.into_iter().rev() {
            self.run_outline(OutlineCommand::Remove { block_id })?;
        }
        Ok(())
    }

    // =========================
    // Range selection
    // =========================

    /// Shift+Up/Down: move focus one block and select everything between the
    /// anchor and the new focus
    pub fn extend_selection(&mut self, direction: Direction) {
        let Some(focused) = self.focused_block.clone() else {
            return;
        };
        let anchor = self.selection_anchor.get_or_insert_with(|| focused.clone()).clone();

        let Some(entry) = self.session.entry(self.active_date) else {
            return;
        };
        let Some(index) = entry.position_of(&focused) else {
            return;
        };
        let target = match direction {
            Direction::Up | Direction::Left => index.checked_sub(1),
            Direction::Down | Direction::Right => Some(index + 1),
        };
        let target = target
            .and_then(|i| entry.block_at(i))
            .map_or(focused, |b| b.id.clone());

        self.selected_blocks = outline::select_range(entry, &anchor, &target);
        self.focused_block = Some(target);
        self.cursor = self.cursor.min(self.focused_len());
        self.slash_menu = None;
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
        self.selected_blocks.clear();
    }

    pub fn is_selected(&self, block_id: &str) -> bool {
        self.selected_blocks.iter().any(|id| id == block_id)
    }

    /// Arrow keys. Left and right walk the text first; up and down jump to the
    /// text boundary before leaving the block.
    pub fn move_caret(&mut self, direction: Direction) -> Result<()> {
        let len = self.focused_len();
        match direction {
            Direction::Left if self.cursor > 0 => self.cursor -= 1,
            Direction::Right if self.cursor < len => self.cursor += 1,
            _ => {
                let Some(block_id) = self.focused_block.clone() else {
                    return Ok(());
                };
                let moved = self.run_outline(OutlineCommand::MoveFocus {
                    block_id,
                    direction,
                    cursor: self.cursor,
                })?;
                if !moved {
                    match direction {
                        Direction::Up => self.cursor = 0,
                        Direction::Down => self.cursor = len,
                        _ => {}
                    }
                }
            }
        }
        self.refresh_slash_menu();
        Ok(())
    }

    pub fn caret_home(&mut self) {
        self.cursor = 0;
        self.refresh_slash_menu();
    }

    pub fn caret_end(&mut self) {
        self.cursor = self.focused_len();
        self.refresh_slash_menu();
    }

    // =========================
    // Entries
    // =========================

    fn switch_entry(&mut self, date: NaiveDate) {
        self.active_date = date;
        self.focused_block = self.active_entry().map(|e| e.first_block().id.clone());
        self.cursor = 0;
        self.slash_menu = None;
        self.clear_selection();
    }

    /// Move to the next older entry
    pub fn previous_entry(&mut self) {
        let older = self
            .session
            .journal()
            .newest_first()
            .into_iter()
            .map(|e| e.date())
            .find(|d| *d < self.active_date);
        if let Some(date) = older {
            self.switch_entry(date);
        }
    }

    /// Move to the next newer entry
    pub fn next_entry(&mut self) {
        let newer = self
            .session
            .journal()
            .newest_first()
            .into_iter()
            .rev()
            .map(|e| e.date())
            .find(|d| *d > self.active_date);
        if let Some(date) = newer {
            self.switch_entry(date);
        }
    }

    pub fn goto_today(&mut self) -> Result<()> {
        self.session.ensure_entry(self.today)?;
        self.switch_entry(self.today);
        Ok(())
    }

    // =========================
    // Slash menu
    // =========================

    /// Open, narrow or close the slash menu from the text around the caret
    pub fn refresh_slash_menu(&mut self) {
        let Some(block_id) = self.focused_block.clone() else {
            self.slash_menu = None;
            return;
        };
        let query = slash::detect_trigger(
            self.focused_content(),
            self.cursor,
            self.config.editor.slash_trigger,
        );

        let menu = query.and_then(|query| {
            let previous = self.slash_menu.as_ref().filter(|m| m.query == query);
            let stack = match previous {
                Some(menu) => menu.stack.clone(),
                None => CatalogStack::new(slash::search(&self.catalog, &query.term)),
            };
            // Nothing left to offer: the text is not a command
            if stack.is_root() && stack.is_empty() {
                return None;
            }
            let selected = slash::clamp_selection(previous.map_or(0, |m| m.selected), stack.len());
            Some(SlashMenu {
                block_id,
                query,
                stack,
                selected,
            })
        });
        self.slash_menu = menu;
    }

    pub fn close_slash_menu(&mut self) {
        self.slash_menu = None;
    }

    pub fn slash_up(&mut self) {
        if let Some(menu) = self.slash_menu.as_mut() {
            menu.selected = menu.selected.saturating_sub(1);
        }
    }

    pub fn slash_down(&mut self) {
        if let Some(menu) = self.slash_menu.as_mut() {
            menu.selected = slash::clamp_selection(menu.selected + 1, menu.stack.len());
        }
    }

    /// Leave a sub-menu. Returns false when already at the top level.
    pub fn slash_back(&mut self) -> bool {
        match self.slash_menu.as_mut() {
            Some(menu) if !menu.stack.is_root() => {
                menu.stack = slash::back(&menu.stack);
                menu.selected = slash::clamp_selection(menu.selected, menu.stack.len());
                true
            }
            _ => false,
        }
    }

    /// Choose the highlighted command
    pub fn slash_select(&mut self) -> Result<()> {
        let Some(menu) = self.slash_menu.clone() else {
            return Ok(());
        };
        let Some(command) = menu.stack.current().get(menu.selected) else {
            return Ok(());
        };

        match slash::navigate(&menu.stack, command) {
            Navigation::Descend(stack) => {
                if let Some(open) = self.slash_menu.as_mut() {
                    open.stack = stack;
                    open.selected = 0;
                }
            }
            Navigation::Execute(action) => {
                self.slash_menu = None;
                self.execute_slash_action(&menu, action)?;
            }
        }
        Ok(())
    }

    fn execute_slash_action(&mut self, menu: &SlashMenu, action: CommandAction) -> Result<()> {
        info!("Running slash command {:?}", action);
        let text = match action {
            CommandAction::InsertText(text) => text,
            CommandAction::InsertToday => format_date(self.today),
            CommandAction::InsertDateLink => date_link(self.today),
            CommandAction::InsertTask => return self.add_task_from_block(menu),
            CommandAction::Named(name) => match name.as_str() {
                "start_time" | "end_time" => Local::now().format("%H:%M").to_string(),
                _ => {
                    self.status_message = Some(format!("Unknown command: {}", name));
                    return Ok(());
                }
            },
            CommandAction::OpenSubmenu => return Ok(()),
        };
        self.replace_query(menu, &text)
    }

    fn replace_query(&mut self, menu: &SlashMenu, text: &str) -> Result<()> {
        if self.focused_block.as_deref() != Some(menu.block_id.as_str()) {
            return Ok(());
        }
        let (content, caret) = slash::complete(self.focused_content(), &menu.query, self.cursor, text);
        if self.set_focused_content(content)? {
            self.cursor = caret;
        }
        Ok(())
    }

    /// Turn the focused block's text into a new root task
    fn add_task_from_block(&mut self, menu: &SlashMenu) -> Result<()> {
        self.replace_query(menu, "")?;

        let title = match self.focused_content().trim() {
            "" => "New task".to_string(),
            text => text.to_string(),
        };
        let mut task = TaskNode::new(title.clone());
        task.start_date = Some(self.active_date);

        if self.session.dispatch_task(&TaskCommand::Add { task, parent_id: None })? {
            self.status_message = Some(format!("Added task: {}", title));
        }
        Ok(())
    }

    // =========================
    // Task drawer
    // =========================

    pub fn toggle_task_drawer(&mut self) {
        self.task_drawer_open = !self.task_drawer_open;
        self.task_selection = slash::clamp_selection(self.task_selection, self.task_rows().len());
    }

    /// The forest flattened depth first, for display
    pub fn task_rows(&self) -> Vec<TaskRow<'_>> {
        fn walk<'a>(list: &'a [TaskNode], depth: usize, acc: &mut Vec<TaskRow<'a>>) {
            for task in list {
                acc.push(TaskRow { depth, task });
                walk(&task.children, depth + 1, acc);
            }
        }

        let mut rows = Vec::new();
        walk(self.session.forest(), 0, &mut rows);
        rows
    }

    fn selected_task_id(&self) -> Option<String> {
        self.task_rows().get(self.task_selection).map(|r| r.task.id.clone())
    }

    pub fn task_up(&mut self) {
        self.task_selection = self.task_selection.saturating_sub(1);
    }

    pub fn task_down(&mut self) {
        self.task_selection = slash::clamp_selection(self.task_selection + 1, self.task_rows().len());
    }

    /// Complete the selected task and its subtasks, or reopen them
    pub fn task_toggle_selected(&mut self) -> Result<()> {
        let Some(task_id) = self.selected_task_id() else {
            return Ok(());
        };
        let completed = tasks::find_task(self.session.forest(), &task_id).map_or(false, |t| t.is_completed());
        let status = if completed { TaskStatus::NotStarted } else { TaskStatus::Completed };

        self.session.dispatch_task(&TaskCommand::SetStatus {
            task_id,
            status,
            cascade: true,
        })?;
        Ok(())
    }

    /// Step the selected task through not started, in progress and completed
    pub fn task_cycle_selected(&mut self) -> Result<()> {
        let Some(task_id) = self.selected_task_id() else {
            return Ok(());
        };
        let Some(current) = tasks::find_task(self.session.forest(), &task_id).map(|t| t.status) else {
            return Ok(());
        };
        let status = match current {
            TaskStatus::NotStarted => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::NotStarted,
        };

        self.session.dispatch_task(&TaskCommand::SetStatus {
            task_id,
            status,
            cascade: false,
        })?;
        Ok(())
    }

    pub fn task_delete_selected(&mut self) -> Result<()> {
        let Some(task_id) = self.selected_task_id() else {
            return Ok(());
        };
        if self.session.dispatch_task(&TaskCommand::Delete { task_id })? {
            self.task_selection = slash::clamp_selection(self.task_selection, self.task_rows().len());
        }
        Ok(())
    }

    // =========================
    // Lifecycle
    // =========================

    /// Roll over to a new day when the date changes under a running app
    pub fn tick(&mut self) -> Result<()> {
        let now = Local::now().date_naive();
        if now != self.today {
            info!("Date changed to {}", now);
            let follow = self.active_date == self.today;
            self.today = now;
            self.session.ensure_entry(now)?;
            if follow {
                self.switch_entry(now);
            }
        }
        Ok(())
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayline_core::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn app_on(today: NaiveDate) -> App {
        let store: Box<dyn SnapshotStore> = Box::new(MemoryStore::new());
        let session = Session::open(store, today).unwrap();
        App::new(session, Config::default(), today)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.insert_char(ch).unwrap();
        }
    }

    fn shape(app: &App) -> Vec<(String, usize)> {
        app.active_entry()
            .unwrap()
            .blocks()
            .iter()
            .map(|b| (b.content.clone(), b.level))
            .collect()
    }

    #[test]
    fn test_app_creation() {
        let app = app_on(day(1));
        assert!(!app.should_quit);
        assert_eq!(app.active_date, day(1));
        assert!(app.focused_block.is_some());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_hello_world_outline() {
        let mut app = app_on(day(1));
        type_text(&mut app, "Hello");
        app.split().unwrap();
        app.indent().unwrap();
        type_text(&mut app, "World");

        assert_eq!(
            shape(&app),
            vec![("Hello".to_string(), 0), ("World".to_string(), 1)]
        );
        assert_eq!(app.cursor, 5);
    }

    #[test]
    fn test_split_mid_word_and_merge_back() {
        let mut app = app_on(day(1));
        type_text(&mut app, "abcd");
        app.cursor = 2;
        app.split().unwrap();
        assert_eq!(shape(&app), vec![("ab".to_string(), 0), ("cd".to_string(), 0)]);
        assert_eq!(app.cursor, 0);

        app.backspace().unwrap();
        assert_eq!(shape(&app).len(), 2, "non-empty block is not merged");

        app.caret_end();
        for _ in 0..2 {
            app.backspace().unwrap();
        }
        app.backspace().unwrap();
        assert_eq!(shape(&app), vec![("ab".to_string(), 0)]);
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_arrow_navigation() {
        let mut app = app_on(day(1));
        type_text(&mut app, "one");
        app.split().unwrap();
        type_text(&mut app, "two");
        let second = app.focused_block.clone();

        app.move_caret(Direction::Up).unwrap();
        assert_eq!(app.focused_block, second);
        assert_eq!(app.cursor, 0);

        app.move_caret(Direction::Up).unwrap();
        assert_ne!(app.focused_block, second);
        assert_eq!(app.focused_content(), "one");

        app.caret_end();
        app.move_caret(Direction::Right).unwrap();
        assert_eq!(app.focused_block, second);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_slash_menu_opens_and_inserts_date() {
        let mut app = app_on(day(1));
        type_text(&mut app, "due /tod");

        let menu = app.slash_menu.clone().unwrap();
        assert_eq!(menu.query.term, "tod");
        assert_eq!(menu.stack.current()[0].name, "Insert date");

        app.slash_select().unwrap();
        let menu = app.slash_menu.clone().unwrap();
        assert_eq!(menu.stack.depth(), 1);
        assert_eq!(menu.stack.current()[0].name, "Today");

        app.slash_select().unwrap();
        assert!(app.slash_menu.is_none());
        assert_eq!(app.focused_content(), "due 2024-01-01");
        assert_eq!(app.cursor, 14);
    }

    #[test]
    fn test_slash_back_and_close() {
        let mut app = app_on(day(1));
        type_text(&mut app, "/");
        assert_eq!(app.slash_menu.as_ref().unwrap().stack.len(), 3);

        app.slash_down();
        app.slash_select().unwrap();
        assert!(app.slash_back());
        assert!(!app.slash_back());

        type_text(&mut app, " ");
        assert!(app.slash_menu.is_none());
    }

    #[test]
    fn test_slash_menu_closes_without_matches() {
        let mut app = app_on(day(1));
        type_text(&mut app, "see /");
        assert!(app.slash_menu.is_some());

        type_text(&mut app, "usr");
        assert!(app.slash_menu.is_none());

        app.split().unwrap();
        assert_eq!(shape(&app), vec![("see /usr".to_string(), 0), (String::new(), 0)]);
    }

    #[test]
    fn test_slash_menu_opens_mid_word() {
        let mut app = app_on(day(1));
        type_text(&mut app, "and/");
        let menu = app.slash_menu.clone().unwrap();
        assert_eq!(menu.query.start, 3);
        assert_eq!(menu.stack.len(), 3);
    }

    #[test]
    fn test_slash_add_task() {
        let mut app = app_on(day(1));
        type_text(&mut app, "Call plumber /add");
        app.slash_select().unwrap();

        assert_eq!(app.focused_content(), "Call plumber ");
        let forest = app.session.forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].title, "Call plumber");
        assert_eq!(forest[0].start_date, Some(day(1)));
    }

    #[test]
    fn test_task_drawer_actions() {
        let mut app = app_on(day(1));
        let parent = TaskNode::with_id("p", "Trip").with_child(TaskNode::with_id("c", "Pack"));
        app.session
            .dispatch_task(&TaskCommand::Add { task: parent, parent_id: None })
            .unwrap();

        app.toggle_task_drawer();
        assert_eq!(app.task_rows().len(), 2);
        assert_eq!(app.task_rows()[1].depth, 1);

        app.task_toggle_selected().unwrap();
        assert!(app.task_rows().iter().all(|r| r.task.is_completed()));

        app.task_down();
        app.task_down();
        assert_eq!(app.task_selection, 1);
        app.task_cycle_selected().unwrap();
        assert_eq!(app.task_rows()[1].task.status, TaskStatus::NotStarted);

        app.task_delete_selected().unwrap();
        assert_eq!(app.task_rows().len(), 1);
        assert_eq!(app.task_selection, 0);
    }

    #[test]
    fn test_range_selection_and_remove() {
        let mut app = app_on(day(1));
        for text in ["one", "two", "three", "four"] {
            if !app.focused_content().is_empty() {
                app.split().unwrap();
            }
            type_text(&mut app, text);
        }

        app.extend_selection(Direction::Up);
        app.extend_selection(Direction::Up);
        assert_eq!(app.focused_content(), "two");
        let selected: Vec<&str> = app
            .selected_blocks
            .iter()
            .map(|id| app.active_entry().unwrap().block(id).unwrap().content.as_str())
            .collect();
        assert_eq!(selected, vec!["two", "three", "four"]);

        // Back toward the anchor shrinks the range
        app.extend_selection(Direction::Down);
        assert_eq!(app.selected_blocks.len(), 2);

        app.remove_block().unwrap();
        let contents: Vec<String> = shape(&app).into_iter().map(|(c, _)| c).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert!(app.selected_blocks.is_empty());
        assert!(app.selection_anchor.is_none());
    }

    #[test]
    fn test_selection_stops_at_entry_edges() {
        let mut app = app_on(day(1));
        app.extend_selection(Direction::Up);
        assert_eq!(app.selected_blocks.len(), 1);

        app.clear_selection();
        assert!(app.selected_blocks.is_empty());
    }

    #[test]
    fn test_entry_navigation() {
        let mut app = app_on(day(3));
        app.session.ensure_entry(day(1)).unwrap();

        app.previous_entry();
        assert_eq!(app.active_date, day(1));
        app.previous_entry();
        assert_eq!(app.active_date, day(1));

        app.next_entry();
        assert_eq!(app.active_date, day(3));

        app.previous_entry();
        app.goto_today().unwrap();
        assert_eq!(app.active_date, day(3));
    }

    #[test]
    fn test_load_errors_surface_in_status() {
        let mut store = MemoryStore::new();
        store.insert_raw("daily_entries", "not json");
        let store: Box<dyn SnapshotStore> = Box::new(store);
        let session = Session::open(store, day(1)).unwrap();

        let app = App::new(session, Config::default(), day(1));
        assert!(app.status_message.unwrap().contains("journal"));
    }
}
