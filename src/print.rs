//! Plain text output of a data table for the `table` command

use std::path::Path;

use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::error::{FormgridError, Result};
use crate::models::{Dataset, DynamicRecord, Record, RecordId};
use crate::storage;
use crate::tui::components::DataTable;

/// Options of a single table print
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    pub sort: Option<String>,
    pub descending: bool,
    pub select: Vec<RecordId>,
}

/// Load `path` and render it as text
pub fn print_file(path: &Path, options: &PrintOptions) -> Result<String> {
    let dataset = storage::load_dataset(path)?;
    let table = build_table(dataset, options)?;
    info!(rows = table.data().len(), selected = table.selected_records().len(), "Printing table");
    Ok(render_text(&table))
}

/// Drive a table through the same sort and toggle operations a user would
pub fn build_table(dataset: Dataset, options: &PrintOptions) -> Result<DataTable<DynamicRecord>> {
    let mut table = DataTable::new(dataset.columns)
        .with_data(dataset.records)
        .selectable(!options.select.is_empty());

    if let Some(key) = &options.sort {
        if !table.sort_by(key) {
            return Err(FormgridError::UnknownColumn(key.clone()));
        }
        if options.descending {
            table.sort_by(key);
        }
    }

    for id in &options.select {
        if !table.is_selected(id) {
            table.toggle_row(id);
        }
    }

    Ok(table)
}

/// Header, one line per row in display order, and the selected rows line
pub fn render_text(table: &DataTable<DynamicRecord>) -> String {
    let rows = table.rows();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|record| {
            table
                .columns
                .iter()
                .map(|c| record.field(&c.field).to_string())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..table.columns.len())
        .map(|i| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(header_label(table, i).width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let prefix_width = if table.selectable { 4 } else { 0 };

    let header: Vec<String> = (0..table.columns.len())
        .map(|i| pad(&header_label(table, i), widths[i]))
        .collect();
    out.push_str(&" ".repeat(prefix_width));
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1) + prefix_width;
    out.push_str(&"-".repeat(total));
    out.push('\n');

    if rows.is_empty() {
        out.push_str(&table.config.empty_text);
        out.push('\n');
    }

    for (record, row) in rows.iter().zip(&cells) {
        if table.selectable {
            out.push_str(if table.is_selected(&record.id()) { "[x] " } else { "[ ] " });
        }
        let line: Vec<String> = row.iter().zip(&widths).map(|(cell, w)| pad(cell, *w)).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    let label_field = table
        .columns
        .iter()
        .find(|c| c.field != "id")
        .map(|c| c.field.as_str())
        .unwrap_or("id");
    let selected: Vec<String> = table
        .selected_records()
        .iter()
        .map(|r| r.field(label_field).to_string())
        .collect();
    out.push('\n');
    out.push_str("Selected Rows: ");
    if selected.is_empty() {
        out.push_str("None");
    } else {
        out.push_str(&selected.join(", "));
    }
    out.push('\n');

    out
}

fn header_label(table: &DataTable<DynamicRecord>, index: usize) -> String {
    let column = &table.columns[index];
    let sort = table.sort_state();
    if sort.column.as_deref() == Some(column.key.as_str()) {
        format!("{} {}", column.title, sort.direction.indicator())
    } else {
        column.title.clone()
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(sort: Option<&str>, descending: bool, select: &[i64]) -> PrintOptions {
        PrintOptions {
            sort: sort.map(str::to_string),
            descending,
            select: select.iter().map(|&n| RecordId::Number(n)).collect(),
        }
    }

    #[test]
    fn test_sorted_descending_with_selection() {
        let table = build_table(Dataset::sample(), &options(Some("age"), true, &[3, 1])).unwrap();
        let text = render_text(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "    Name     Age ▼");
        assert_eq!(lines[2], "[ ] Bob      30");
        assert_eq!(lines[3], "[x] Charlie  25");
        assert_eq!(lines[4], "[x] Alice    22");
        assert_eq!(lines.last(), Some(&"Selected Rows: Alice, Charlie"));
    }

    #[test]
    fn test_unsorted_without_selection() {
        let table = build_table(Dataset::sample(), &PrintOptions::default()).unwrap();
        let text = render_text(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name     Age");
        assert_eq!(lines[2], "Alice    22");
        assert!(text.ends_with("Selected Rows: None\n"));
    }

    #[test]
    fn test_unknown_sort_column_is_an_error() {
        let result = build_table(Dataset::sample(), &options(Some("email"), false, &[]));
        assert!(matches!(result, Err(FormgridError::UnknownColumn(key)) if key == "email"));
    }

    #[test]
    fn test_empty_dataset_prints_empty_text() {
        let dataset = Dataset {
            records: Vec::new(),
            ..Dataset::sample()
        };
        let table = build_table(dataset, &options(Some("name"), false, &[])).unwrap();
        assert!(render_text(&table).contains("No data available."));
    }

    #[test]
    fn test_print_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,age\n1,Ann,40\n2,Ben,35").unwrap();

        let text = print_file(file.path(), &options(Some("age"), false, &[2])).unwrap();
        assert!(text.contains("[x] Ben"));
        assert!(text.contains("Selected Rows: Ben"));
    }
}
