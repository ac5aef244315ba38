//! formgrid: a terminal input field and a sortable, selectable data table
//! built on ratatui, with a demo application and a plain text printer.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod print;
pub mod storage;
pub mod tui;

pub use error::{FormgridError, Result};
