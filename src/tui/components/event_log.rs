//! Timestamped log of component callbacks shown by the demo

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::tui::ui::Styles;

/// Kind of logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Change,
    Selection,
    Sort,
    Info,
}

impl EntryKind {
    fn prefix(&self) -> &'static str {
        match self {
            EntryKind::Change => "✎",
            EntryKind::Selection => "✓",
            EntryKind::Sort => "⇅",
            EntryKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub message: String,
    pub kind: EntryKind,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl LogEntry {
    pub fn new(kind: EntryKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Bounded history of events, newest last
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    pub max_entries: usize,
    pub show_timestamp: bool,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: 100,
            show_timestamp: true,
        }
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn without_timestamps(mut self) -> Self {
        self.show_timestamp = false;
        self
    }

    pub fn push(&mut self, kind: EntryKind, message: impl Into<String>) {
        self.entries.push_back(LogEntry::new(kind, message));
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn format_entry(&self, entry: &LogEntry) -> Line<'static> {
        let style = match entry.kind {
            EntryKind::Change => Styles::info(),
            EntryKind::Selection => Styles::success(),
            EntryKind::Sort => Styles::title(),
            EntryKind::Info => Styles::inactive(),
        };

        let mut spans = vec![Span::styled(format!("{} ", entry.kind.prefix()), style)];
        if self.show_timestamp {
            spans.push(Span::styled(
                format!("[{}] ", entry.timestamp.format("%H:%M:%S")),
                Styles::inactive(),
            ));
        }
        spans.push(Span::raw(entry.message.clone()));
        Line::from(spans)
    }

    /// Render the most recent entries that fit in `area`
    pub fn render(&self, f: &mut Frame, area: Rect, title: &str) {
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());
        let visible = block.inner(area).height as usize;

        let skip = self.entries.len().saturating_sub(visible);
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .skip(skip)
            .map(|entry| ListItem::new(self.format_entry(entry)))
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}
