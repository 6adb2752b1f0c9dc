//! CSV export
//!
//! Writes expenses as `id,date,category,amount,note` rows, amounts with two
//! decimals. Quoting follows RFC 4180 via the `csv` crate.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

/// Column header of the exported file
pub const CSV_HEADER: [&str; 5] = ["id", "date", "category", "amount", "note"];

/// Export expenses to CSV in the order given
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> ExpenseResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        csv_writer.write_record([
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.category.clone(),
            expense.amount.to_string(),
            expense.note.clone(),
        ])?;
    }

    csv_writer
        .flush()
        .map_err(|e| ExpenseError::Export(e.to_string()))
}
