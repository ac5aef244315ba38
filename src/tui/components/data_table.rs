//! Sortable, selectable table over caller-owned records

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::models::{CellValue, Column, Record};
use crate::tui::{
    traits::{Component, Navigable},
    ui::{self, Spinner, Styles},
};

const CHECKBOX_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

/// What happened in response to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction<Id> {
    SortChanged(SortState),
    /// Ids of all selected records, in data order
    SelectionChanged(Vec<Id>),
    None,
}

/// Display configuration for a data table
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    pub title: String,
    pub show_borders: bool,
    pub empty_text: String,
    pub loading_text: String,
    pub column_spacing: u16,
    pub max_column_width: u16,
}

impl Default for DataTableConfig {
    fn default() -> Self {
        Self {
            title: "Data".to_string(),
            show_borders: true,
            empty_text: "No data available.".to_string(),
            loading_text: "Loading...".to_string(),
            column_spacing: 2,
            max_column_width: 40,
        }
    }
}

impl DataTableConfig {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }
}

/// Compare two cell values for the given direction
pub fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match direction {
        SortDirection::Ascending => a.cmp(b),
        SortDirection::Descending => b.cmp(a),
    }
}

/// Display order of `data` as indices into it.
///
/// Always sorts from the original order; the sort is stable, so records that
/// compare equal keep their original relative order.
pub fn sorted_indices<T: Record>(data: &[T], columns: &[Column], sort: &SortState) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..data.len()).collect();

    let column = sort
        .column
        .as_deref()
        .and_then(|key| columns.iter().find(|c| c.key == key));
    if let Some(column) = column {
        let values: Vec<CellValue> = data.iter().map(|r| r.field(&column.field)).collect();
        indices.sort_by(|&a, &b| compare_values(&values[a], &values[b], sort.direction));
    }

    indices
}

pub type RowSelectHandler<T> = Box<dyn FnMut(&[&T])>;

/// Table that sorts by clicked headers and tracks a set of selected ids
pub struct DataTable<T: Record> {
    pub columns: Vec<Column>,
    pub loading: bool,
    pub selectable: bool,
    pub config: DataTableConfig,
    data: Arc<[T]>,
    sort: SortState,
    selected: HashSet<T::Id>,
    state: TableState,
    focused: bool,
    focused_column: usize,
    spinner: Spinner,
    on_row_select: Option<RowSelectHandler<T>>,
    header_hits: Vec<(Rect, usize)>,
    checkbox_columns: Option<(u16, u16)>,
    body_area: Option<Rect>,
}

impl<T: Record> DataTable<T> {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            loading: false,
            selectable: false,
            config: DataTableConfig::default(),
            data: Arc::from(Vec::new()),
            sort: SortState::default(),
            selected: HashSet::new(),
            state: TableState::default(),
            focused: false,
            focused_column: 0,
            spinner: Spinner::default(),
            on_row_select: None,
            header_hits: Vec::new(),
            checkbox_columns: None,
            body_area: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<Arc<[T]>>) -> Self {
        self.set_data(data);
        self
    }

    pub fn with_config(mut self, config: DataTableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Register the handler invoked with the selected records after each toggle
    pub fn on_row_select(mut self, handler: impl FnMut(&[&T]) + 'static) -> Self {
        self.on_row_select = Some(Box::new(handler));
        self
    }

    /// Replace the records. The selection set is kept.
    pub fn set_data(&mut self, data: impl Into<Arc<[T]>>) {
        self.data = data.into();
        self.state.select(if self.data.is_empty() { None } else { Some(0) });
        *self.state.offset_mut() = 0;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Click on a column header.
    ///
    /// Returns `false` for unknown or non-sortable columns, which are inert.
    pub fn sort_by(&mut self, key: &str) -> bool {
        let sortable = self.columns.iter().find(|c| c.key == key).map(|c| c.sortable);
        if sortable != Some(true) {
            return false;
        }

        if self.sort.column.as_deref() == Some(key) {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortState {
                column: Some(key.to_string()),
                direction: SortDirection::Ascending,
            };
        }
        debug!(column = key, direction = ?self.sort.direction, "Table sort changed");
        true
    }

    /// Records in display order
    pub fn rows(&self) -> Vec<&T> {
        sorted_indices(&self.data, &self.columns, &self.sort)
            .into_iter()
            .map(|i| &self.data[i])
            .collect()
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selected.contains(id)
    }

    /// Selected records in original data order
    pub fn selected_records(&self) -> Vec<&T> {
        self.data
            .iter()
            .filter(|r| self.selected.contains(&r.id()))
            .collect()
    }

    /// Flip the checkbox of the record with `id`
    pub fn toggle_row(&mut self, id: &T::Id) -> TableAction<T::Id> {
        if !self.selectable {
            return TableAction::None;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }

        let data = Arc::clone(&self.data);
        let records: Vec<&T> = data.iter().filter(|r| self.selected.contains(&r.id())).collect();
        debug!(row = ?id, selected = records.len(), "Row selection toggled");

        if let Some(handler) = self.on_row_select.as_mut() {
            handler(&records);
        }
        TableAction::SelectionChanged(records.iter().map(|r| r.id()).collect())
    }

    /// Record under the row cursor
    pub fn cursor_record(&self) -> Option<&T> {
        let position = self.state.selected()?;
        let index = *sorted_indices(&self.data, &self.columns, &self.sort).get(position)?;
        self.data.get(index)
    }

    pub fn toggle_cursor_row(&mut self) -> TableAction<T::Id> {
        match self.cursor_record().map(|r| r.id()) {
            Some(id) => self.toggle_row(&id),
            None => TableAction::None,
        }
    }

    fn sort_action(&mut self, column_index: usize) -> TableAction<T::Id> {
        let Some(key) = self.columns.get(column_index).map(|c| c.key.clone()) else {
            return TableAction::None;
        };
        self.focused_column = column_index;
        if self.sort_by(&key) {
            TableAction::SortChanged(self.sort.clone())
        } else {
            TableAction::None
        }
    }

    fn header_cell(&self, index: usize, column: &Column) -> Cell<'static> {
        let mut text = column.title.clone();
        if column.sortable {
            let indicator = match &self.sort.column {
                Some(key) if *key == column.key => self.sort.direction.indicator(),
                _ => "↕",
            };
            text.push(' ');
            text.push_str(indicator);
        }
        let style = if self.focused && index == self.focused_column {
            Styles::selected()
        } else {
            Styles::title()
        };
        Cell::from(Span::styled(text, style))
    }

    fn column_widths(&self, rows: &[&T]) -> Vec<u16> {
        self.columns
            .iter()
            .map(|column| {
                let header = column.title.width() + if column.sortable { 2 } else { 0 };
                let widest = rows
                    .iter()
                    .map(|r| r.field(&column.field).to_string().width())
                    .max()
                    .unwrap_or(0);
                (header.max(widest) as u16).min(self.config.max_column_width)
            })
            .collect()
    }

    fn block(&self) -> Block<'static> {
        if !self.config.show_borders {
            return Block::default();
        }
        let title = if self.data.is_empty() || self.loading {
            self.config.title.clone()
        } else if self.selectable {
            format!(
                "{} ({} rows, {} selected)",
                self.config.title,
                self.data.len(),
                self.selected_records().len()
            )
        } else {
            format!("{} ({} rows)", self.config.title, self.data.len())
        };
        let border_style = if self.focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
    }

    fn render_message(&self, f: &mut Frame, area: Rect, line: Line<'static>) {
        let block = self.block();
        let inner = block.inner(area);
        let mut lines = vec![Line::default(); (inner.height.saturating_sub(1) / 2) as usize];
        lines.push(line);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.header_hits.clear();
        self.checkbox_columns = None;
        self.body_area = None;

        if self.loading {
            let line = Line::from(vec![
                Span::styled(self.spinner.symbol(), Styles::info()),
                Span::raw(" "),
                Span::styled(self.config.loading_text.clone(), Styles::inactive()),
            ]);
            self.render_message(f, area, line);
            return;
        }

        if self.data.is_empty() {
            let line = Line::from(Span::styled(self.config.empty_text.clone(), Styles::inactive()));
            self.render_message(f, area, line);
            return;
        }

        let rows = self.rows();
        let mut widths = self.column_widths(&rows);

        let mut header_cells: Vec<Cell> = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            header_cells.push(Cell::from(""));
        }
        header_cells.extend(
            self.columns
                .iter()
                .enumerate()
                .map(|(i, column)| self.header_cell(i, column)),
        );

        let body: Vec<Row> = rows
            .iter()
            .map(|record| {
                let mut cells: Vec<Cell> = Vec::with_capacity(self.columns.len() + 1);
                if self.selectable {
                    let mark = if self.is_selected(&record.id()) { "[x]" } else { "[ ]" };
                    cells.push(Cell::from(mark));
                }
                cells.extend(
                    self.columns
                        .iter()
                        .map(|column| Cell::from(record.field(&column.field).to_string())),
                );
                Row::new(cells)
            })
            .collect();

        if self.selectable {
            widths.insert(0, CHECKBOX_WIDTH);
        }

        let block = self.block();
        let inner = block.inner(area);
        let highlight = if self.focused { Styles::selected() } else { Style::default() };

        let table = Table::new(body, widths.iter().map(|w| Constraint::Length(*w)))
            .header(Row::new(header_cells))
            .block(block)
            .column_spacing(self.config.column_spacing)
            .highlight_style(highlight);

        f.render_stateful_widget(table, area, &mut self.state);

        // Remember where headers and checkboxes landed for mouse input
        let mut x = inner.x;
        for (position, width) in widths.iter().enumerate() {
            let width = (*width).min(inner.right().saturating_sub(x));
            if self.selectable && position == 0 {
                self.checkbox_columns = Some((x, x + width));
            } else {
                let column_index = if self.selectable { position - 1 } else { position };
                self.header_hits
                    .push((Rect::new(x, inner.y, width, inner.height.min(1)), column_index));
            }
            x = x.saturating_add(width + self.config.column_spacing);
        }
        self.body_area = Some(Rect::new(
            inner.x,
            inner.y.saturating_add(1),
            inner.width,
            inner.height.saturating_sub(1),
        ));
    }
}

impl<T: Record> Navigable for DataTable<T> {
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 { count - 1 } else { selected - 1 };
        self.state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let new_selected = match self.state.selected() {
            Some(selected) => (selected + 1) % count,
            None => 0,
        };
        self.state.select(Some(new_selected));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.data.len()
    }
}

impl<T: Record> Component for DataTable<T> {
    type Action = TableAction<T::Id>;

    fn render(&mut self, f: &mut Frame, area: Rect) {
        DataTable::render(self, f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> TableAction<T::Id> {
        if self.loading {
            return TableAction::None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Home => self.navigate_to_first(),
            KeyCode::End => self.navigate_to_last(),
            KeyCode::Left => self.focused_column = self.focused_column.saturating_sub(1),
            KeyCode::Right => {
                self.focused_column = (self.focused_column + 1).min(self.columns.len().saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char('s') => return self.sort_action(self.focused_column),
            KeyCode::Char(c @ '1'..='9') => return self.sort_action(c as usize - '1' as usize),
            KeyCode::Char(' ') => return self.toggle_cursor_row(),
            _ => {}
        }
        TableAction::None
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> TableAction<T::Id> {
        if self.loading {
            return TableAction::None;
        }
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let header = self
                    .header_hits
                    .iter()
                    .find(|(rect, _)| ui::hit(*rect, column, row))
                    .map(|(_, index)| *index);
                if let Some(index) = header {
                    return self.sort_action(index);
                }

                let Some(body) = self.body_area.filter(|r| ui::hit(*r, column, row)) else {
                    return TableAction::None;
                };
                let position = self.state.offset() + (row - body.y) as usize;
                if position >= self.data.len() {
                    return TableAction::None;
                }
                self.focused = true;
                self.state.select(Some(position));
                if self
                    .checkbox_columns
                    .is_some_and(|(start, end)| column >= start && column < end)
                {
                    return self.toggle_cursor_row();
                }
            }
            MouseEventKind::ScrollUp => self.navigate_up(),
            MouseEventKind::ScrollDown => self.navigate_down(),
            _ => {}
        }
        TableAction::None
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn tick(&mut self) {
        if self.loading {
            self.spinner.advance();
        }
    }
}

impl<T: Record> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("loading", &self.loading)
            .field("selectable", &self.selectable)
            .field("sort", &self.sort)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}
