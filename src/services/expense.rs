//! Expense service
//!
//! Business logic on top of the expense repository: validation, id
//! assignment, querying and aggregation. Every mutation is persisted before
//! the method returns.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::csv::export_expenses_csv;
use crate::models::{Expense, ExpenseId, ExpensePatch, Money};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a mut Storage,
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive category match; empty means no category filter
    pub category: Option<String>,
    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Only expenses on or after `start`
    pub fn from(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Only expenses on or before `end`
    pub fn to(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Filter by date range
    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.from(start).to(end)
    }

    /// Check whether an expense satisfies every supplied predicate
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !expense.in_category(category) {
                return false;
            }
        }
        expense.in_range(self.start_date, self.end_date)
    }
}

/// Summed amount for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Add a new expense and persist it
    ///
    /// Category and note are trimmed. The new id is one more than the
    /// largest existing id; once that would pass `u64::MAX` the add fails
    /// and the store is left as it was.
    pub fn add(
        &mut self,
        amount: Money,
        category: &str,
        date: NaiveDate,
        note: &str,
    ) -> ExpenseResult<Expense> {
        validate_amount(amount)?;

        let repo = &mut self.storage.expenses;
        let id = repo
            .next_id()
            .ok_or_else(|| ExpenseError::Validation("No expense ids left to assign".into()))?;
        let expense = Expense::new(id, amount, category.trim(), date, note.trim());

        repo.insert(expense.clone());
        repo.save()?;

        info!(id = %expense.id, amount = %expense.amount, category = %expense.category, "added expense");
        Ok(expense)
    }

    /// All expenses, newest first; `limit` of `None` or `Some(0)` returns everything
    pub fn list(&self, limit: Option<usize>) -> Vec<Expense> {
        let mut expenses = self.storage.expenses.all().to_vec();
        sort_newest_first(&mut expenses);

        if let Some(limit) = limit.filter(|&l| l > 0) {
            expenses.truncate(limit);
        }
        expenses
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Option<Expense> {
        self.storage.expenses.get(id).cloned()
    }

    /// Find an expense by ID string; unparseable ids simply match nothing
    pub fn find(&self, identifier: &str) -> Option<Expense> {
        identifier.parse::<ExpenseId>().ok().and_then(|id| self.get(id))
    }

    /// Delete an expense
    ///
    /// Returns `false` and leaves the store untouched if the id is unknown.
    pub fn delete(&mut self, id: ExpenseId) -> ExpenseResult<bool> {
        let repo = &mut self.storage.expenses;
        if repo.remove(id).is_none() {
            return Ok(false);
        }
        repo.save()?;

        info!(id = %id, "deleted expense");
        Ok(true)
    }

    /// Apply a partial update
    ///
    /// Only fields present in the patch change. Returns `false` if the id is
    /// unknown.
    pub fn edit(&mut self, id: ExpenseId, patch: &ExpensePatch) -> ExpenseResult<bool> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }

        let repo = &mut self.storage.expenses;
        let Some(expense) = repo.get_mut(id) else {
            return Ok(false);
        };
        patch.apply_to(expense);
        repo.save()?;

        info!(id = %id, "edited expense");
        Ok(true)
    }

    /// Expenses matching the filter, newest first
    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self
            .storage
            .expenses
            .all()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_newest_first(&mut expenses);
        expenses
    }

    /// Sum of amounts over the filtered expenses
    ///
    /// Fails with a validation error if the sum does not fit in `Money`.
    pub fn total(&self, filter: &ExpenseFilter) -> ExpenseResult<Money> {
        self.filter(filter)
            .iter()
            .try_fold(Money::zero(), |acc, e| add_amounts(acc, e.amount))
    }

    /// Per-category totals within an optional date range
    ///
    /// Categories appear in the order first met while walking the expenses
    /// newest first, keyed by their stored spelling.
    pub fn summary_by_category(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ExpenseResult<Vec<CategoryTotal>> {
        let filter = ExpenseFilter {
            category: None,
            start_date: start,
            end_date: end,
        };

        let mut summary: Vec<CategoryTotal> = Vec::new();
        for expense in self.filter(&filter) {
            match summary.iter().position(|s| s.category == expense.category) {
                Some(index) => {
                    summary[index].total = add_amounts(summary[index].total, expense.amount)?;
                }
                None => summary.push(CategoryTotal {
                    category: expense.category,
                    total: expense.amount,
                }),
            }
        }
        Ok(summary)
    }

    /// Case-insensitive substring search over notes and categories, in storage order
    pub fn search(&self, term: &str) -> Vec<Expense> {
        self.storage
            .expenses
            .all()
            .iter()
            .filter(|e| e.matches_term(term))
            .cloned()
            .collect()
    }

    /// Export every expense, newest first, to a CSV file
    pub fn export_csv(&self, path: impl AsRef<Path>) -> ExpenseResult<PathBuf> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let expenses = self.list(None);
        export_expenses_csv(&expenses, BufWriter::new(file))?;

        info!(path = %path.display(), count = expenses.len(), "exported expenses");
        Ok(path.to_path_buf())
    }
}

fn validate_amount(amount: Money) -> ExpenseResult<()> {
    if amount.is_negative() {
        return Err(ExpenseError::Validation(format!(
            "Amount cannot be negative: {}",
            amount
        )));
    }
    Ok(())
}

fn add_amounts(a: Money, b: Money) -> ExpenseResult<Money> {
    a.checked_add(b)
        .ok_or_else(|| ExpenseError::Validation("Total is too large to compute".into()))
}

/// Stable sort on date only, so same-day expenses keep their stored order
fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}
