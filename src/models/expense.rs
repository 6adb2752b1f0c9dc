//! Expense model
//!
//! A single tracked expense: how much, what for, when, and an optional note.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;

/// A tracked expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, never reused
    pub id: ExpenseId,

    /// Amount spent (never negative)
    pub amount: Money,

    /// Free-text grouping label; matched case-insensitively
    pub category: String,

    /// When the expense happened
    pub date: NaiveDate,

    /// Optional note
    #[serde(default)]
    pub note: String,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        id: ExpenseId,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            date,
            note: note.into(),
        }
    }

    /// Case-insensitive category comparison
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Check if the date lies in the inclusive range; missing bounds are open
    pub fn in_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        start.map_or(true, |s| self.date >= s) && end.map_or(true, |e| self.date <= e)
    }

    /// Case-insensitive substring match against the note or the category
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.note.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.id,
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )?;
        if !self.note.is_empty() {
            write!(f, " ({})", self.note)?;
        }
        Ok(())
    }
}

/// A partial update: only the fields that are `Some` are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl ExpensePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.date.is_none() && self.note.is_none()
    }

    /// Apply the supplied fields to an expense, leaving the rest untouched
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(note) = &self.note {
            expense.note = note.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expense {
        Expense::new(
            ExpenseId::new(1),
            Money::from_cents(1250),
            "Food",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Lunch with Sam",
        )
    }

    #[test]
    fn test_in_category_ignores_case() {
        let e = sample();
        assert!(e.in_category("food"));
        assert!(e.in_category("FOOD"));
        assert!(!e.in_category("foo"));
    }

    #[test]
    fn test_in_range_inclusive() {
        let e = sample();
        let day = e.date;
        assert!(e.in_range(Some(day), Some(day)));
        assert!(e.in_range(None, None));
        assert!(!e.in_range(day.succ_opt(), None));
        assert!(!e.in_range(None, day.pred_opt()));
    }

    #[test]
    fn test_matches_term() {
        let e = sample();
        assert!(e.matches_term("LUNCH"));
        assert!(e.matches_term("oo"));
        assert!(!e.matches_term("dinner"));
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut e = sample();
        let before = e.clone();

        ExpensePatch::new().note("Brunch").apply_to(&mut e);

        assert_eq!(e.note, "Brunch");
        assert_eq!(e.amount, before.amount);
        assert_eq!(e.category, before.category);
        assert_eq!(e.date, before.date);
        assert_eq!(e.id, before.id);
    }

    #[test]
    fn test_empty_patch() {
        assert!(ExpensePatch::new().is_empty());
        assert!(!ExpensePatch::new().amount(Money::zero()).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["category"], "Food");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["note"], "Lunch with Sam");
    }

    #[test]
    fn test_note_defaults_to_empty() {
        let e: Expense = serde_json::from_str(
            r#"{"id": "4", "amount": 3, "category": "bus", "date": "2024-02-02"}"#,
        )
        .unwrap();
        assert_eq!(e.note, "");
        assert_eq!(e.amount.cents(), 300);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "#1 2024-01-01 Food 12.50 (Lunch with Sam)"
        );
    }
}
