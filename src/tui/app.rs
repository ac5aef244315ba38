//! Demo application assembling the input field and data table

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, info};

use super::components::{
    DataTable, DataTableConfig, EntryKind, EventLog, FieldAction, InputField, InputKind,
    TableAction,
};
use super::traits::Component;
use super::ui::{self, Styles};
use crate::config::Config;
use crate::models::{Dataset, DynamicRecord, Record, RecordId};

/// Which component receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Password,
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Password,
            Focus::Password => Focus::Table,
            Focus::Table => Focus::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Name => Focus::Table,
            Focus::Password => Focus::Name,
            Focus::Table => Focus::Password,
        }
    }
}

/// Demo application state
pub struct App {
    pub config: Config,
    pub focus: Focus,
    pub name: InputField,
    pub password: InputField,
    pub table: DataTable<DynamicRecord>,
    pub log: EventLog,
    dataset: Dataset,
    showing_data: bool,
    /// Labels of the rows in the last selection report
    selected_rows: Vec<String>,
    areas: [Rect; 3],

    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    pub fn new(config: Config, dataset: Dataset) -> Self {
        let name = InputField::new()
            .with_label("Your Name")
            .with_placeholder("Enter your name")
            .with_helper_text("Please enter your full name")
            .with_error_message("Name is required")
            .with_variant(config.input_variant)
            .with_size(config.input_size)
            .clearable(true)
            .on_change(|value| debug!(value, "name onChange"));

        let password = InputField::new()
            .with_label("Password")
            .with_placeholder("Enter a password")
            .with_helper_text("Ctrl+R shows or hides the password")
            .with_variant(config.input_variant)
            .with_size(config.input_size)
            .with_kind(InputKind::Password)
            .with_password_toggle(true)
            .clearable(true);

        let table = DataTable::new(dataset.columns.clone())
            .with_data(dataset.records.clone())
            .with_config(DataTableConfig::new("Users"))
            .selectable(true)
            .on_row_select(|rows: &[&DynamicRecord]| {
                let ids: Vec<String> = rows.iter().map(|r| r.id().to_string()).collect();
                info!("onRowSelect: [{}]", ids.join(", "));
            });

        let mut app = Self {
            config,
            focus: Focus::Name,
            name,
            password,
            table,
            log: EventLog::new().with_max_entries(200),
            dataset,
            showing_data: true,
            selected_rows: Vec::new(),
            areas: [Rect::default(); 3],
            should_quit: false,
            show_help_popup: false,
        };
        app.sync_name_validity();
        app.apply_focus();
        app
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = self.config.tick_rate();
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| self.draw(f))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.on_tick();
                last_tick = Instant::now();
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn on_tick(&mut self) {
        self.name.tick();
        self.password.tick();
        self.table.tick();
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.show_help_popup {
                    self.show_help_popup = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.previous());
                return;
            }
            KeyCode::F(2) => {
                let variant = self.name.variant.next();
                self.name.variant = variant;
                self.password.variant = variant;
                self.log.push(EntryKind::Info, format!("variant = {}", variant.as_str()));
                return;
            }
            KeyCode::F(3) => {
                let size = self.name.size.next();
                self.name.size = size;
                self.password.size = size;
                self.log.push(EntryKind::Info, format!("size = {}", size.as_str()));
                return;
            }
            KeyCode::F(4) => {
                self.name.loading = !self.name.loading;
                self.sync_name_validity();
                self.log.push(EntryKind::Info, format!("input loading = {}", self.name.loading));
                return;
            }
            KeyCode::F(5) => {
                self.name.disabled = !self.name.disabled;
                self.log.push(EntryKind::Info, format!("input disabled = {}", self.name.disabled));
                return;
            }
            KeyCode::F(6) => {
                self.table.loading = !self.table.loading;
                self.log.push(EntryKind::Info, format!("table loading = {}", self.table.loading));
                return;
            }
            KeyCode::F(7) => {
                self.toggle_table_data();
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        match self.focus {
            Focus::Name => {
                let action = self.name.handle_key_event(key);
                self.apply_name_action(action);
            }
            Focus::Password => {
                let action = self.password.handle_key_event(key);
                self.apply_password_action(action);
            }
            Focus::Table => {
                let action = self.table.handle_key_event(key);
                self.apply_table_action(action);
            }
        }
    }

    /// Route clicks to the component under the pointer, focusing it
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.show_help_popup {
            return;
        }

        let target = [Focus::Name, Focus::Password, Focus::Table]
            .into_iter()
            .zip(self.areas)
            .find(|(_, area)| ui::hit(*area, mouse.column, mouse.row))
            .map(|(focus, _)| focus);
        let Some(target) = target else {
            return;
        };

        if mouse.kind == MouseEventKind::Down(MouseButton::Left) && target != self.focus {
            self.set_focus(target);
        }

        match target {
            Focus::Name => {
                let action = self.name.handle_mouse_event(mouse);
                self.apply_name_action(action);
            }
            Focus::Password => {
                let action = self.password.handle_mouse_event(mouse);
                self.apply_password_action(action);
            }
            Focus::Table => {
                let action = self.table.handle_mouse_event(mouse);
                self.apply_table_action(action);
            }
        }
    }

    fn apply_name_action(&mut self, action: FieldAction) {
        if let FieldAction::Changed(value) = action {
            self.log.push(EntryKind::Change, format!("name onChange: {:?}", value));
            self.name.set_value(value);
            self.sync_name_validity();
        }
    }

    fn apply_password_action(&mut self, action: FieldAction) {
        match action {
            FieldAction::Changed(value) => {
                let masked = "•".repeat(value.chars().count());
                self.log.push(EntryKind::Change, format!("password onChange: {:?}", masked));
                self.password.set_value(value);
            }
            FieldAction::VisibilityToggled(visible) => {
                let state = if visible { "shown" } else { "hidden" };
                self.log.push(EntryKind::Info, format!("password {}", state));
            }
            FieldAction::None => {}
        }
    }

    fn apply_table_action(&mut self, action: TableAction<RecordId>) {
        match action {
            TableAction::SelectionChanged(ids) => {
                self.selected_rows = self.row_labels(&ids);
                self.log.push(
                    EntryKind::Selection,
                    format!("onRowSelect: [{}]", self.selected_rows_text()),
                );
            }
            TableAction::SortChanged(sort) => {
                let column = sort.column.unwrap_or_default();
                self.log.push(
                    EntryKind::Sort,
                    format!("sort {} {}", column, sort.direction.indicator()),
                );
            }
            TableAction::None => {}
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.apply_focus();
    }

    fn apply_focus(&mut self) {
        self.name.set_focus(self.focus == Focus::Name);
        self.password.set_focus(self.focus == Focus::Password);
        self.table.set_focus(self.focus == Focus::Table);
    }

    /// The name is required unless a lookup is in flight
    fn sync_name_validity(&mut self) {
        self.name.invalid = self.name.value.is_empty() && !self.name.loading;
    }

    fn toggle_table_data(&mut self) {
        self.showing_data = !self.showing_data;
        if self.showing_data {
            self.table.set_data(self.dataset.records.clone());
        } else {
            self.table.set_data(Vec::<DynamicRecord>::new());
        }
        self.log.push(
            EntryKind::Info,
            if self.showing_data { "showing data" } else { "showing empty table" },
        );
    }

    /// Labels of the records with `ids`, read from the first non-id column
    fn row_labels(&self, ids: &[RecordId]) -> Vec<String> {
        let label_field = self
            .dataset
            .columns
            .iter()
            .find(|c| c.field != "id")
            .map(|c| c.field.as_str())
            .unwrap_or("id");

        self.table
            .data()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .map(|r| r.field(label_field).to_string())
            .collect()
    }

    /// Display text of the rows last reported by the table
    pub fn selected_rows_text(&self) -> String {
        if self.selected_rows.is_empty() {
            "None".to_string()
        } else {
            self.selected_rows.join(", ")
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let fields_height = self.name.height() + self.password.height() + 3;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(fields_height),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_fields(f, chunks[0]);

        self.areas[2] = chunks[1];
        self.table.render(f, chunks[1]);

        let selected = Paragraph::new(format!("Selected Rows: {}", self.selected_rows_text()))
            .style(Styles::inactive());
        f.render_widget(selected, chunks[2]);

        self.log.render(f, chunks[3], "Actions");
        self.draw_status_bar(f, chunks[4]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_fields(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(
                "InputField Demo ({} / {})",
                self.name.variant.as_str(),
                self.name.size.as_str()
            ))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.name.height()),
                Constraint::Length(self.password.height()),
                Constraint::Length(1),
            ])
            .split(inner);

        self.areas[0] = rows[0];
        self.areas[1] = rows[1];
        self.name.render(f, rows[0]);
        self.password.render(f, rows[1]);

        let current = Paragraph::new(format!("Current value: {}", self.name.value));
        f.render_widget(current, rows[2]);
    }

    /// Draw status bar with shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let focus = match self.focus {
            Focus::Name => "Name",
            Focus::Password => "Password",
            Focus::Table => "Table",
        };
        let status_text = format!(
            "formgrid demo - {} | Tab: Focus | F1: Help | Esc: Quit",
            focus
        );

        let status_bar = Paragraph::new(status_text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    /// Draw help popup with shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = ui::centered_rect(70, 80, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(Self::help_text())
            .block(
                Block::default()
                    .title("Help - Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn help_text() -> &'static str {
        "Global:\n\
        Tab / Shift+Tab - Move focus\n\
        F1 - Toggle this help\n\
        Esc / Ctrl+C - Quit\n\
        F2 - Cycle input variant\n\
        F3 - Cycle input size\n\
        F4 - Toggle input loading\n\
        F5 - Toggle input disabled\n\
        F6 - Toggle table loading\n\
        F7 - Toggle empty table\n\n\
        Input fields:\n\
        Type to edit, ←/→ Home/End move the cursor\n\
        Ctrl+U - Clear\n\
        Ctrl+R - Show/hide password\n\n\
        Table:\n\
        ↑/↓ - Move row cursor\n\
        ←/→ - Choose header, Enter/s - Sort\n\
        1-9 - Sort by column number\n\
        Space - Toggle row selection\n\
        Mouse clicks work on headers, checkboxes and buttons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::SortDirection;
    use crate::tui::test_support::render_lines;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default(), Dataset::sample())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_name_is_invalid_until_typed() {
        let mut app = app();
        assert!(app.name.invalid);

        type_text(&mut app, "Alice");
        assert_eq!(app.name.value, "Alice");
        assert!(!app.name.invalid);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(app.name.value, "");
        assert!(app.name.invalid);
    }

    #[test]
    fn test_loading_suppresses_required_error() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::F(4)));
        assert!(app.name.loading);
        assert!(!app.name.invalid);
        type_text(&mut app, "x");
        assert_eq!(app.name.value, "");
    }

    #[test]
    fn test_focus_cycles_and_routes_keys() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Password);
        type_text(&mut app, "pw");
        assert_eq!(app.password.value, "pw");
        assert_eq!(app.name.value, "");

        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.is_focused());
        assert!(!app.password.is_focused());

        app.handle_key_event(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Password);
    }

    #[test]
    fn test_table_selection_updates_selected_rows() {
        let mut app = app();
        app.set_focus(Focus::Table);
        assert_eq!(app.selected_rows_text(), "None");

        app.handle_key_event(key(KeyCode::Char(' ')));
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Char(' ')));
        assert_eq!(app.selected_rows_text(), "Alice, Bob");

        app.handle_key_event(key(KeyCode::Char('2')));
        assert_eq!(app.table.sort_state().direction, SortDirection::Ascending);
        assert_eq!(app.log.latest().map(|e| e.kind), Some(EntryKind::Sort));
    }

    #[test]
    fn test_selected_rows_kept_when_table_is_emptied() {
        let mut app = app();
        app.set_focus(Focus::Table);
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Char(' ')));
        assert_eq!(app.selected_rows_text(), "Bob");

        app.handle_key_event(key(KeyCode::F(7)));
        assert!(app.table.data().is_empty());
        assert_eq!(app.selected_rows_text(), "Bob");

        let lines = render_lines(80, 40, |f| app.draw(f));
        assert!(lines.iter().any(|l| l.contains("Selected Rows: Bob")));
    }

    #[test]
    fn test_toggle_empty_and_loading() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::F(7)));
        assert!(app.table.data().is_empty());
        app.handle_key_event(key(KeyCode::F(7)));
        assert_eq!(app.table.data().len(), 3);

        app.handle_key_event(key(KeyCode::F(6)));
        assert!(app.table.loading);
    }

    #[test]
    fn test_escape_closes_help_then_quits() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::F(1)));
        assert!(app.show_help_popup);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.show_help_popup);
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_draw_demo_screen() {
        let mut app = app();
        type_text(&mut app, "Ann");
        let lines = render_lines(80, 40, |f| app.draw(f));

        assert!(lines.iter().any(|l| l.contains("Your Name")));
        assert!(lines.iter().any(|l| l.contains("Current value: Ann")));
        assert!(lines.iter().any(|l| l.contains("Charlie")));
        assert!(lines.iter().any(|l| l.contains("Selected Rows: None")));
        assert!(lines.iter().any(|l| l.contains("name onChange")));
    }
}
