//! Expense repository for JSON storage
//!
//! Owns the in-memory list of expenses and its backing file. The file holds a
//! plain JSON array of records and is rewritten in full on every save.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ExpenseError;
use crate::models::{Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

/// Repository for expense persistence
#[derive(Debug)]
pub struct ExpenseRepository {
    path: PathBuf,
    data: Vec<Expense>,
}

impl ExpenseRepository {
    /// Create an empty repository backed by `path`; nothing is read until [`load`](Self::load)
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load expenses from disk
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and also treated as an empty store, so a corrupt file never
    /// prevents the tracker from starting.
    pub fn load(&mut self) {
        match read_json::<Vec<Expense>, _>(&self.path) {
            Ok(expenses) => {
                debug!(path = %self.path.display(), count = expenses.len(), "loaded expenses");
                self.data = expenses;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not load expenses, starting empty");
                self.data.clear();
            }
        }
    }

    /// Save all expenses to disk
    pub fn save(&self) -> Result<(), ExpenseError> {
        write_json_atomic(&self.path, &self.data)?;
        debug!(path = %self.path.display(), count = self.data.len(), "saved expenses");
        Ok(())
    }

    /// All expenses in insertion order
    pub fn all(&self) -> &[Expense] {
        &self.data
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.data.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.data.iter_mut().find(|e| e.id == id)
    }

    /// Append an expense (does not save)
    pub fn insert(&mut self, expense: Expense) {
        self.data.push(expense);
    }

    /// Remove an expense, returning it if it existed (does not save)
    pub fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.data.iter().position(|e| e.id == id)?;
        Some(self.data.remove(index))
    }

    /// One more than the largest id present, so deleted ids are never reused
    ///
    /// `None` when the largest id is already `u64::MAX`.
    pub fn next_id(&self) -> Option<ExpenseId> {
        match self.data.iter().map(|e| e.id).max() {
            Some(max) => max.next(),
            None => Some(ExpenseId::FIRST),
        }
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }
}
