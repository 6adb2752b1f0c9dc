//! Export module for the expense tracker
//!
//! - CSV: spreadsheet-compatible listing of every expense

pub mod csv;

pub use self::csv::{export_expenses_csv, CSV_HEADER};
