use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// A single field value read out of a record.
///
/// Values have a total natural ordering so any column can be sorted:
/// `Null < Bool < numbers < Text`. Integers and floats compare numerically
/// with each other.
#[derive(Debug, Clone, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Interpret a raw text cell (as found in CSV) as the narrowest value type
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        match trimmed {
            "true" => CellValue::Bool(true),
            "false" => CellValue::Bool(false),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => cmp_floats(*a, *b),
            (CellValue::Int(a), CellValue::Float(b)) => cmp_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Numeric order, so `-0.0 == 0.0`. NaNs sit at the ends as in `total_cmp`.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a float.
///
/// Casting the integer to `f64` rounds above 2^53 and would make equality
/// non-transitive, so the float is split into its integral part and fraction.
fn cmp_int_float(a: i64, b: f64) -> Ordering {
    if b.is_nan() {
        return if b.is_sign_negative() { Ordering::Greater } else { Ordering::Less };
    }
    // i128 holds every floor(b) in the i64 range plus a margin on both sides
    const LIMIT: f64 = 1.0e30;
    if b >= LIMIT {
        return Ordering::Less;
    }
    if b <= -LIMIT {
        return Ordering::Greater;
    }

    let floor = b.floor();
    match i128::from(a).cmp(&(floor as i128)) {
        Ordering::Equal if b > floor => Ordering::Less,
        ordering => ordering,
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Identifier of a record: numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(trimmed.to_string()),
        })
    }
}

impl From<RecordId> for CellValue {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => CellValue::Int(n),
            RecordId::Text(s) => CellValue::Text(s),
        }
    }
}

/// A row of data that can be shown in a [`DataTable`](crate::tui::components::DataTable).
///
/// Records are owned by the caller; the table only reads them.
pub trait Record {
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Unique identifier of this record
    fn id(&self) -> Self::Id;

    /// Value of the named field, `CellValue::Null` when absent
    fn field(&self, name: &str) -> CellValue;
}

/// Describes one displayed column of a table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Column {
    /// Unique key of the column
    pub key: String,
    /// Header label
    pub title: String,
    /// Name of the record field this column reads
    pub field: String,
    #[serde(default)]
    pub sortable: bool,
}

impl Column {
    /// Column reading the field with the same name as its key
    pub fn new(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            field: key.to_string(),
            sortable: false,
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = field.to_string();
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// Record with a dynamic set of named fields, used for data loaded from files
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    pub id: RecordId,
    pub fields: BTreeMap<String, CellValue>,
}

impl DynamicRecord {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<CellValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

impl Record for DynamicRecord {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> CellValue {
        if name == "id" {
            return self.id.clone().into();
        }
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

/// Columns and records loaded together
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub records: Vec<DynamicRecord>,
}

impl Dataset {
    /// The three demo users
    pub fn sample() -> Self {
        let user = |id: i64, name: &str, age: i64| {
            DynamicRecord::new(RecordId::Number(id))
                .with_field("name", name)
                .with_field("age", age)
        };

        Self {
            columns: vec![
                Column::new("name", "Name").sortable(),
                Column::new("age", "Age").sortable(),
            ],
            records: vec![user(1, "Alice", 22), user(2, "Bob", 30), user(3, "Charlie", 25)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse(" 42 "), CellValue::Int(42));
        assert_eq!(CellValue::parse("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("Alice"), CellValue::Text("Alice".to_string()));
        assert!(matches!(CellValue::parse("NaN"), CellValue::Text(_)));
    }

    #[test]
    fn test_cell_value_ordering() {
        assert!(CellValue::Null < CellValue::Bool(false));
        assert!(CellValue::Bool(true) < CellValue::Int(-5));
        assert!(CellValue::Int(2) < CellValue::Float(2.5));
        assert!(CellValue::Float(30.0) > CellValue::Int(22));
        assert!(CellValue::Int(1_000) < CellValue::from("a"));
        assert!(CellValue::from("Alice") < CellValue::from("Bob"));
        assert_eq!(CellValue::Int(3), CellValue::Float(3.0));
        assert_eq!(CellValue::Int(0), CellValue::Float(-0.0));
        assert!(CellValue::Int(-3) > CellValue::Float(-3.5));
        assert!(CellValue::Int(i64::MAX) < CellValue::Float(f64::INFINITY));
        assert!(CellValue::Int(i64::MIN) > CellValue::Float(f64::NEG_INFINITY));
        assert!(CellValue::Int(i64::MIN) > CellValue::Float(-f64::NAN.abs()));
        assert!(CellValue::Int(i64::MAX) < CellValue::Float(f64::NAN.abs()));
    }

    #[test]
    fn test_int_float_order_is_exact_above_2_pow_53() {
        let big = 1_i64 << 53;
        let a = CellValue::Int(big + 1);
        let b = CellValue::Float(big as f64);
        let c = CellValue::Int(big);

        assert!(a > b);
        assert_eq!(b, c);
        assert!(a > c);
        assert!(CellValue::Float((big + 2) as f64) > a);
        assert_eq!(CellValue::Int(i64::MAX), CellValue::Int(i64::MAX));
        assert!(CellValue::Int(i64::MAX) < CellValue::Float(9_223_372_036_854_775_808.0));
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(22).to_string(), "22");
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Float(22.5).to_string(), "22.5");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!("7".parse::<RecordId>().unwrap(), RecordId::Number(7));
        assert_eq!("u-7".parse::<RecordId>().unwrap(), RecordId::Text("u-7".to_string()));
    }

    #[test]
    fn test_dynamic_record_fields() {
        let record = DynamicRecord::new(RecordId::Number(1)).with_field("name", "Alice");
        assert_eq!(record.field("name"), CellValue::from("Alice"));
        assert_eq!(record.field("id"), CellValue::Int(1));
        assert!(record.field("missing").is_null());
    }

    #[test]
    fn test_column_from_json() {
        let columns: Vec<Column> = serde_json::from_str(
            r#"[
                {"key": "years", "title": "Years", "field": "age", "sortable": true},
                {"key": "name", "title": "Name", "field": "name"}
            ]"#,
        )
        .unwrap();

        assert_eq!(columns[0], Column::new("years", "Years").with_field("age").sortable());
        assert_eq!(columns[1], Column::new("name", "Name"));
        assert!(!columns[1].sortable);
    }

    #[test]
    fn test_sample_dataset() {
        let dataset = Dataset::sample();
        assert_eq!(dataset.records.len(), 3);
        assert!(dataset.column("age").map(|c| c.sortable).unwrap_or(false));
        assert!(dataset.column("email").is_none());
    }
}
