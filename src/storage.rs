//! Loading table data from CSV and JSON files

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{FormgridError, Result};
use crate::models::{CellValue, Column, Dataset, DynamicRecord, RecordId};

const ID_FIELD: &str = "id";

/// Load a dataset, picking the parser from the file extension
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let dataset = match extension.as_str() {
        "csv" => parse_csv(std::fs::File::open(path)?)?,
        "json" => parse_json(&std::fs::read_to_string(path)?)?,
        other => return Err(FormgridError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "Loaded {} records with {} columns from {}",
        dataset.records.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV with a header row. Columns follow header order.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let id_index = headers
        .iter()
        .position(|h| h.trim() == ID_FIELD)
        .ok_or(FormgridError::MissingIdColumn)?;

    let field_names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let row_data = result?;
        let raw_id = row_data.get(id_index).unwrap_or("").trim();
        if raw_id.is_empty() {
            return Err(FormgridError::MissingId { row: row + 1 });
        }
        let id: RecordId = match raw_id.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        };

        let mut record = DynamicRecord::new(id);
        for (index, raw) in row_data.iter().enumerate() {
            if index == id_index {
                continue;
            }
            if let Some(name) = field_names.get(index) {
                record.fields.insert(name.clone(), CellValue::parse(raw));
            }
        }
        records.push(record);
    }

    let columns = field_names
        .iter()
        .filter(|name| name.as_str() != ID_FIELD)
        .map(|name| column_for_field(name))
        .collect();

    debug!("Parsed {} CSV records", records.len());
    Ok(Dataset { columns, records })
}

/// Parse a JSON array of objects, each carrying an `id`.
///
/// Columns are every field name seen across all objects, in first-seen order.
pub fn parse_json(text: &str) -> Result<Dataset> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(text)?;

    let mut field_names: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(objects.len());

    for (row, object) in objects.into_iter().enumerate() {
        let id = match object.get(ID_FIELD) {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(n) => RecordId::Number(n),
                None => RecordId::Text(n.to_string()),
            },
            Some(Value::String(s)) if !s.trim().is_empty() => RecordId::Text(s.clone()),
            _ => return Err(FormgridError::MissingId { row: row + 1 }),
        };

        let mut record = DynamicRecord::new(id);
        for (name, value) in object {
            if name == ID_FIELD {
                continue;
            }
            if !field_names.contains(&name) {
                field_names.push(name.clone());
            }
            record.fields.insert(name, json_to_cell(value));
        }
        records.push(record);
    }

    let columns = field_names.iter().map(|name| column_for_field(name)).collect();

    debug!("Parsed {} JSON records", records.len());
    Ok(Dataset { columns, records })
}

fn json_to_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => n.as_f64().map(CellValue::Float).unwrap_or_default(),
        },
        Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}

fn column_for_field(name: &str) -> Column {
    Column::new(name, &title_case(name)).sortable()
}

/// "first_name" -> "First name"
fn title_case(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
