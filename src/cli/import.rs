//! CLI command handler for JSON import

use std::path::Path;

use crate::error::ExpenseResult;
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &mut Storage, file: &Path) -> ExpenseResult<()> {
    ImportService::new(storage).import_json_file(file)?;
    println!("Imported.");
    Ok(())
}
