//! Rendering of long tables for storage and display.

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty, to_records_json};
pub use terminal::format_table;
