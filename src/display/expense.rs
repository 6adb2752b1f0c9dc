//! Expense display formatting
//!
//! Plain-text tables and detail views for terminal output.

use crate::models::{Expense, Money};
use crate::services::CategoryTotal;

const TABLE_WIDTH: usize = 60;

/// Format a single expense as a table row
pub fn format_expense_row(expense: &Expense) -> String {
    format!(
        "{:<4} {:<12} {:<15} {:>8}  {}",
        expense.id,
        expense.date.format("%Y-%m-%d").to_string(),
        truncate(&expense.category, 15),
        expense.amount,
        expense.note
    )
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<4} {:<12} {:<15} {:>8}  {}\n",
        "ID", "DATE", "CATEGORY", "AMOUNT", "NOTE"
    ));
    output.push_str(&"-".repeat(TABLE_WIDTH));
    output.push('\n');

    for expense in expenses {
        output.push_str(format_expense_row(expense).trim_end());
        output.push('\n');
    }

    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", expense.id));
    output.push_str(&format!("Date:     {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:   {}\n",
        expense.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category: {}\n", expense.category));
    if !expense.note.is_empty() {
        output.push_str(&format!("Note:     {}\n", expense.note));
    }

    output
}

/// Format a total followed by per-category totals
///
/// When the total covers a single category, the total line names it.
pub fn format_summary(
    total: Money,
    category: Option<&str>,
    summary: &[CategoryTotal],
    currency_symbol: &str,
) -> String {
    let amount = total.format_with_symbol(currency_symbol);
    let mut output = match category {
        Some(category) => format!("Total ({}): {}\n", category, amount),
        None => format!("Total: {}\n", amount),
    };

    output.push_str("\nSummary by category:\n");
    if summary.is_empty() {
        output.push_str("  (none)\n");
    }
    for entry in summary {
        output.push_str(&format!(
            "  {}: {}\n",
            entry.category,
            entry.total.format_with_symbol(currency_symbol)
        ));
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseId;
    use chrono::NaiveDate;

    fn sample() -> Expense {
        Expense::new(
            ExpenseId::new(7),
            Money::from_cents(1250),
            "food",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "lunch",
        )
    }

    #[test]
    fn test_format_expense_row() {
        let row = format_expense_row(&sample());
        assert!(row.starts_with("7    2024-01-15"));
        assert!(row.contains("   12.50  lunch"));
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_expense_list(&[]), "No expenses found.\n");
    }

    #[test]
    fn test_format_list_has_header_and_rows() {
        let formatted = format_expense_list(&[sample(), sample()]);
        let lines: Vec<_> = formatted.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert_eq!(lines[1], "-".repeat(60));
    }

    #[test]
    fn test_format_details() {
        let formatted = format_expense_details(&sample(), "$");
        assert!(formatted.contains("Amount:   $12.50"));
        assert!(formatted.contains("Category: food"));
        assert!(formatted.contains("Note:     lunch"));
    }

    #[test]
    fn test_format_summary() {
        let summary = vec![CategoryTotal {
            category: "food".into(),
            total: Money::from_cents(750),
        }];
        let formatted = format_summary(Money::from_cents(750), None, &summary, "€");
        assert!(formatted.starts_with("Total: €7.50\n"));
        assert!(formatted.contains("  food: €7.50"));
    }

    #[test]
    fn test_format_summary_names_category_total() {
        let summary = vec![
            CategoryTotal {
                category: "food".into(),
                total: Money::from_cents(750),
            },
            CategoryTotal {
                category: "rent".into(),
                total: Money::from_cents(1000),
            },
        ];
        let formatted = format_summary(Money::from_cents(750), Some("food"), &summary, "$");
        assert!(formatted.starts_with("Total (food): $7.50\n"));
        assert!(formatted.contains("  rent: $10.00"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10), "Short");
        let result = truncate("A very long category", 10);
        assert_eq!(result, "A very ...");
    }
}
