//! Expense CLI commands
//!
//! Implements the day-to-day commands: add, list, show, filter, total, edit,
//! delete and search.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list, format_summary};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_date, parse_optional_date, ExpenseId, ExpensePatch, Money};
use crate::services::{ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Add a new expense
    Add {
        /// Amount (e.g., "250.50")
        amount: String,
        /// Category (food, transport, bills, ...)
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD, DD-MM-YYYY or DD/MM/YYYY), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List expenses, newest first
    List {
        /// Number of expenses to show (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },
    /// List expenses by category and/or date range
    Filter {
        /// Category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
        /// Start date, inclusive
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive
        #[arg(long)]
        to: Option<String>,
    },
    /// Show the total and a per-category summary
    Total {
        /// Only count this category in the total line
        #[arg(short, long)]
        category: Option<String>,
        /// Start date, inclusive
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive
        #[arg(long)]
        to: Option<String>,
    },
    /// Edit an expense; omitted fields keep their value
    Edit {
        /// Expense ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
    /// Search notes and categories
    Search {
        /// Text to look for (case-insensitive)
        term: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let mut service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            note,
        } => {
            let amount = parse_amount(&amount)?;
            let category = non_empty(category).unwrap_or_else(|| settings.default_category.clone());
            let date = parse_date(date.as_deref().unwrap_or(""))?;
            let note = note.unwrap_or_default();

            let expense = service.add(amount, &category, date, &note)?;
            println!("Added: {}", expense);
        }

        ExpenseCommands::List { limit } => {
            let limit = limit.unwrap_or(settings.list_limit);
            let expenses = service.list(Some(limit));
            print!("{}", format_expense_list(&expenses));
        }

        ExpenseCommands::Show { id } => {
            let expense = service
                .find(&id)
                .ok_or_else(|| ExpenseError::expense_not_found(&id))?;
            print!("{}", format_expense_details(&expense, symbol));
        }

        ExpenseCommands::Filter { category, from, to } => {
            let filter = build_filter(category, from.as_deref(), to.as_deref())?;
            print!("{}", format_expense_list(&service.filter(&filter)));
        }

        ExpenseCommands::Total { category, from, to } => {
            let filter = build_filter(category, from.as_deref(), to.as_deref())?;
            let total = service.total(&filter)?;
            let summary = service.summary_by_category(filter.start_date, filter.end_date)?;
            print!(
                "{}",
                format_summary(total, filter.category.as_deref(), &summary, symbol)
            );
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            date,
            note,
        } => {
            let expense_id = parse_id(&id)?;

            // empty values mean "keep the current value"
            let mut patch = ExpensePatch::new();
            if let Some(amount) = non_empty(amount) {
                patch = patch.amount(parse_amount(&amount)?);
            }
            if let Some(category) = non_empty(category) {
                patch = patch.category(category);
            }
            if let Some(date) = non_empty(date) {
                patch = patch.date(parse_date(&date)?);
            }
            if let Some(note) = non_empty(note) {
                patch = patch.note(note);
            }

            if service.get(expense_id).is_none() {
                return Err(ExpenseError::expense_not_found(&id));
            }
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            if !service.edit(expense_id, &patch)? {
                return Err(ExpenseError::expense_not_found(&id));
            }
            if let Some(updated) = service.get(expense_id) {
                println!("Updated: {}", updated);
            }
        }

        ExpenseCommands::Delete { id } => {
            let deleted = match id.parse::<ExpenseId>() {
                Ok(expense_id) => service.delete(expense_id)?,
                Err(_) => false,
            };
            if !deleted {
                return Err(ExpenseError::expense_not_found(&id));
            }
            println!("Deleted expense {}", id.trim());
        }

        ExpenseCommands::Search { term } => {
            print!("{}", format_expense_list(&service.search(&term)));
        }
    }

    Ok(())
}

fn parse_amount(text: &str) -> ExpenseResult<Money> {
    Money::parse(text).map_err(|_| {
        ExpenseError::Validation(format!(
            "Invalid amount: '{}'. Use a number like 250.50",
            text.trim()
        ))
    })
}

fn parse_id(text: &str) -> ExpenseResult<ExpenseId> {
    text.parse()
        .map_err(|_| ExpenseError::expense_not_found(text.trim()))
}

fn build_filter(
    category: Option<String>,
    from: Option<&str>,
    to: Option<&str>,
) -> ExpenseResult<ExpenseFilter> {
    Ok(ExpenseFilter {
        category: non_empty(category).map(|c| c.trim().to_string()),
        start_date: parse_optional_date(from)?,
        end_date: parse_optional_date(to)?,
    })
}

/// Blank values count as not supplied; others pass through as given
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
