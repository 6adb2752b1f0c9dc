//! Storage layer for the expense tracker
//!
//! JSON file storage with atomic writes and automatic directory creation.

pub mod expenses;
pub mod file_io;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};

use crate::config::paths::ExpensePaths;
use crate::error::ExpenseError;

/// Storage coordinator that owns the repositories
pub struct Storage {
    paths: ExpensePaths,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: ExpensePaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &ExpensePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) {
        self.expenses.load();
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ExpenseError> {
        self.expenses.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("tracker");
        let paths = ExpensePaths::with_base_dir(base.clone());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all();

        assert!(base.exists());
        assert_eq!(storage.expenses.path(), base.join("expenses.json"));
        assert_eq!(storage.expenses.count(), 0);
    }

    #[test]
    fn test_save_all_writes_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage.save_all().unwrap();
        let contents = std::fs::read_to_string(storage.paths().expenses_file()).unwrap();
        assert_eq!(contents.trim(), "[]");
    }
}
