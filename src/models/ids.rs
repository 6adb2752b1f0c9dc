//! Expense identifiers
//!
//! Ids are small sequential integers, stored on disk as decimal strings
//! (`"1"`, `"2"`, ...). A newtype keeps them from being mixed up with amounts
//! or limits at compile time.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of an expense record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(u64);

impl ExpenseId {
    /// The id handed out by an empty store
    pub const FIRST: ExpenseId = ExpenseId(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is exhausted
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Parse an ID from a string
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        s.parse()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl From<u64> for ExpenseId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl Serialize for ExpenseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpenseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExpenseIdVisitor)
    }
}

struct ExpenseIdVisitor;

impl<'de> Visitor<'de> for ExpenseIdVisitor {
    type Value = ExpenseId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer id, as a string or a number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ExpenseId, E> {
        Ok(ExpenseId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ExpenseId, E> {
        u64::try_from(v)
            .map(ExpenseId)
            .map_err(|_| E::custom(format!("negative id: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ExpenseId, E> {
        v.parse()
            .map_err(|_| E::custom(format!("invalid id: '{}'", v)))
    }
}
