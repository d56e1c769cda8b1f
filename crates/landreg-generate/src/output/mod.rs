//! Export writers for generated batches.

pub mod csv;
pub mod display;
pub mod json;

pub use self::csv::{CSV_HEADER, write_batch_csv};
pub use display::format_application;
pub use json::{read_batch_json, write_batch_json};
