//! Terminal user interface: the input field and data table components and
//! the demo application that assembles them.

pub mod app;
pub mod components;
pub mod traits;
pub mod ui;

pub use app::App;
