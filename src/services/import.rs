//! JSON import service
//!
//! Bulk-adds expenses from a JSON file shaped like the tracker's own store.
//! Each record goes through the normal add path and gets a fresh id. Records
//! that cannot be read are skipped without aborting the import, and records
//! already added stay added.

use std::path::Path;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::date::{parse_date_relative_to, today};
use crate::models::Money;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Category given to imported records that have none
pub const DEFAULT_IMPORT_CATEGORY: &str = "uncategorized";

/// A record from an import file, ready to add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub note: String,
}

impl ImportRecord {
    /// Read one record-like JSON value
    ///
    /// `amount` is required and may be a number or a numeric string. A
    /// missing `category`, `date` or `note` falls back to `uncategorized`,
    /// `today` and empty respectively; a present field of the wrong type is
    /// an error.
    pub fn from_value(value: &Value, today: NaiveDate) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| format!("expected an object, found {}", value))?;

        let amount = match object.get("amount") {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| format!("amount out of range: {}", n))
                .and_then(|v| Money::from_decimal(v).map_err(|e| e.to_string()))?,
            Some(Value::String(s)) => Money::parse(s).map_err(|e| e.to_string())?,
            Some(other) => return Err(format!("amount is not numeric: {}", other)),
            None => return Err("missing amount".to_string()),
        };

        let category = optional_str(object, "category")?.unwrap_or(DEFAULT_IMPORT_CATEGORY);
        let date = match optional_str(object, "date")? {
            Some(text) => parse_date_relative_to(text, today).map_err(|e| e.to_string())?,
            None => today,
        };
        let note = optional_str(object, "note")?.unwrap_or("");

        Ok(Self {
            amount,
            category: category.to_string(),
            date,
            note: note.to_string(),
        })
    }
}

fn optional_str<'v>(object: &'v Map<String, Value>, key: &str) -> Result<Option<&'v str>, String> {
    match object.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(format!("{} is not a string: {}", key, other)),
    }
}

/// Service for JSON import
pub struct ImportService<'a> {
    storage: &'a mut Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Import every readable record from a JSON file
    ///
    /// Fails if the file is missing, is not JSON, or does not hold a list.
    /// Individual unreadable records are skipped.
    pub fn import_json_file(&mut self, path: impl AsRef<Path>) -> ExpenseResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExpenseError::Import(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ExpenseError::Import(format!("Failed to read file: {}", e)))?;
        let data: Value = serde_json::from_str(&content).map_err(|e| {
            ExpenseError::Import(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let records = data.as_array().ok_or_else(|| {
            ExpenseError::Import(format!("{} does not contain a list of expenses", path.display()))
        })?;

        self.import_values(records)
    }

    /// Add each readable record in order
    ///
    /// Records that fail to parse or validate are skipped; storage errors
    /// still propagate.
    pub fn import_values(&mut self, records: &[Value]) -> ExpenseResult<()> {
        let today = today();
        let mut service = ExpenseService::new(&mut *self.storage);
        let mut imported = 0usize;

        for (index, value) in records.iter().enumerate() {
            let record = match ImportRecord::from_value(value, today) {
                Ok(record) => record,
                Err(reason) => {
                    debug!(index, %reason, "skipping import record");
                    continue;
                }
            };

            match service.add(record.amount, &record.category, record.date, &record.note) {
                Ok(_) => imported += 1,
                Err(e) if e.is_validation() => {
                    debug!(index, error = %e, "skipping import record");
                }
                Err(e) => return Err(e),
            }
        }

        info!(imported, total = records.len(), "import finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ExpensePaths;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all();
        (temp_dir, storage)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_defaults() {
        let record = ImportRecord::from_value(&json!({"amount": 4}), ymd(2024, 5, 5)).unwrap();
        assert_eq!(record.amount.cents(), 400);
        assert_eq!(record.category, "uncategorized");
        assert_eq!(record.date, ymd(2024, 5, 5));
        assert_eq!(record.note, "");
    }

    #[test]
    fn test_record_coerces_string_amount_and_lenient_date() {
        let value = json!({"amount": "12.5", "category": "food", "date": "01-02-2024", "note": "x"});
        let record = ImportRecord::from_value(&value, ymd(2024, 5, 5)).unwrap();
        assert_eq!(record.amount.cents(), 1250);
        assert_eq!(record.date, ymd(2024, 2, 1));
    }

    #[test]
    fn test_record_rejections() {
        let today = ymd(2024, 5, 5);
        assert!(ImportRecord::from_value(&json!({"amount": "abc"}), today).is_err());
        assert!(ImportRecord::from_value(&json!({"category": "food"}), today).is_err());
        assert!(ImportRecord::from_value(&json!({"amount": 1, "category": null}), today).is_err());
        assert!(ImportRecord::from_value(&json!({"amount": 1, "date": "someday"}), today).is_err());
        assert!(ImportRecord::from_value(&json!("just text"), today).is_err());
    }

    #[test]
    fn test_import_skips_malformed_records() {
        let (temp_dir, mut storage) = create_test_storage();
        let file = temp_dir.path().join("incoming.json");
        std::fs::write(
            &file,
            json!([
                {"amount": 10, "category": "food", "date": "2024-01-01", "note": "ok"},
                {"amount": "abc", "category": "food", "date": "2024-01-02"}
            ])
            .to_string(),
        )
        .unwrap();

        ImportService::new(&mut storage).import_json_file(&file).unwrap();

        let all = storage.expenses.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].note, "ok");
        assert_eq!(all[0].amount.cents(), 1000);
    }

    #[test]
    fn test_import_assigns_fresh_ids_after_existing() {
        let (_temp_dir, mut storage) = create_test_storage();
        ExpenseService::new(&mut storage)
            .add(Money::from_cents(100), "a", ymd(2024, 1, 1), "")
            .unwrap();

        let records = vec![
            json!({"id": "1", "amount": 2, "date": "2024-01-02"}),
            json!({"id": "1", "amount": 3, "date": "2024-01-03"}),
        ];
        ImportService::new(&mut storage).import_values(&records).unwrap();

        let ids: Vec<String> = storage
            .expenses
            .all()
            .iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_import_skips_negative_amounts() {
        let (_temp_dir, mut storage) = create_test_storage();
        let records = vec![json!({"amount": -5}), json!({"amount": 5})];

        ImportService::new(&mut storage).import_values(&records).unwrap();
        assert_eq!(storage.expenses.count(), 1);
    }

    #[test]
    fn test_import_persists() {
        let (_temp_dir, mut storage) = create_test_storage();
        ImportService::new(&mut storage)
            .import_values(&[json!({"amount": 1.25, "category": "tea"})])
            .unwrap();

        let mut reloaded = crate::storage::ExpenseRepository::new(storage.expenses.path().to_path_buf());
        reloaded.load();
        assert_eq!(reloaded.count(), 1);
        assert_eq!(reloaded.all()[0].category, "tea");
    }

    #[test]
    fn test_import_missing_file() {
        let (temp_dir, mut storage) = create_test_storage();
        let err = ImportService::new(&mut storage)
            .import_json_file(temp_dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Import(_)));
    }

    #[test]
    fn test_import_rejects_non_list() {
        let (temp_dir, mut storage) = create_test_storage();
        let file = temp_dir.path().join("object.json");
        std::fs::write(&file, r#"{"amount": 3}"#).unwrap();

        let err = ImportService::new(&mut storage)
            .import_json_file(&file)
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Import(_)));
        assert_eq!(storage.expenses.count(), 0);
    }
}
