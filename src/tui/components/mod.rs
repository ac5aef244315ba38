//! Reusable UI components
//!
//! Each component keeps its own local state and reports transitions back
//! to its owner through the action returned from its event handlers.

pub mod data_table;
pub mod event_log;
pub mod input_field;

pub use data_table::{DataTable, DataTableConfig, SortDirection, SortState, TableAction};
pub use event_log::{EntryKind, EventLog};
pub use input_field::{FieldAction, InputField, InputKind, InputSize, InputVariant};
