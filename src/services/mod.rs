//! Service layer for the expense tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, id assignment and aggregation.

pub mod expense;
pub mod import;

pub use expense::{CategoryTotal, ExpenseFilter, ExpenseService};
pub use import::{ImportRecord, ImportService};
