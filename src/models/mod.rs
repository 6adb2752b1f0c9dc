//! Core data models for the expense tracker

pub mod date;
pub mod expense;
pub mod ids;
pub mod money;

pub use date::{parse_date, parse_optional_date};
pub use expense::{Expense, ExpensePatch};
pub use ids::ExpenseId;
pub use money::{Money, MoneyParseError};
