//! CLI command for CSV export

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::ExpenseResult;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Handle the export command; without an output path the settings default is used
pub fn handle_export_command(
    storage: &mut Storage,
    settings: &Settings,
    output: Option<PathBuf>,
) -> ExpenseResult<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&settings.export_file));
    let written = ExpenseService::new(storage).export_csv(&output)?;
    println!("Exported to {}", written.display());
    Ok(())
}
