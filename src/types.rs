//! Type definitions for BrandMeld
//!
//! This module provides type-safe wrappers around primitive types
//! to prevent accidental misuse of IDs and storage keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A type-safe wrapper for history item IDs
///
/// The value is the creation time in epoch milliseconds.
/// Decoding rejects values that are not a representable timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHistoryId", into = "i64")]
pub struct HistoryId(pub i64);

impl HistoryId {
    /// Create a new HistoryId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Allocate an id from the current clock, strictly greater than `newest`
    ///
    /// Returns `None` when no representable timestamp follows `newest`.
    pub fn next_after(newest: Option<HistoryId>) -> Option<Self> {
        let now = Utc::now().timestamp_millis();
        let next = match newest {
            Some(HistoryId(prev)) if now <= prev => prev.checked_add(1)?,
            _ => now,
        };
        DateTime::from_timestamp_millis(next).map(|_| Self(next))
    }

    /// Get the inner i64 value
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Interpret the id as its creation timestamp
    pub fn timestamp(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<i64> for HistoryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Checked conversion used when decoding stored ids
impl TryFrom<RawHistoryId> for HistoryId {
    type Error = String;

    fn try_from(raw: RawHistoryId) -> std::result::Result<Self, Self::Error> {
        let id = HistoryId(raw.0);
        match id.timestamp() {
            Some(_) => Ok(id),
            None => Err(format!("history id {} is not a valid timestamp", raw.0)),
        }
    }
}

impl From<HistoryId> for i64 {
    fn from(id: HistoryId) -> Self {
        id.0
    }
}

/// Stored form of a [`HistoryId`] before range checking
#[derive(Deserialize)]
#[serde(transparent)]
pub struct RawHistoryId(i64);

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HistoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(HistoryId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_id_from_conversion() {
        let id: HistoryId = 42.into();
        assert_eq!(id.as_i64(), 42);
        let raw: i64 = id.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_next_after_is_strictly_increasing() {
        let far_future = HistoryId::new(Utc::now().timestamp_millis() + 60_000);
        let next = HistoryId::next_after(Some(far_future)).unwrap();
        assert_eq!(next.as_i64(), far_future.as_i64() + 1);

        let first = HistoryId::next_after(None).unwrap();
        assert!(first.as_i64() > 0);
    }

    #[test]
    fn test_next_after_largest_id() {
        assert_eq!(HistoryId::next_after(Some(HistoryId::new(i64::MAX))), None);
        assert_eq!(HistoryId::next_after(Some(HistoryId::new(i64::MAX / 2))), None);
    }

    #[test]
    fn test_decode_rejects_unrepresentable_id() {
        let id: HistoryId = serde_json::from_str("1700000000000").unwrap();
        assert_eq!(id.as_i64(), 1_700_000_000_000);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1700000000000");

        assert!(serde_json::from_str::<HistoryId>("9223372036854775807").is_err());
        assert!(serde_json::from_str::<HistoryId>("\"1\"").is_err());
    }

    #[test]
    fn test_timestamp() {
        let id = HistoryId::new(1_700_000_000_000);
        let ts = id.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_and_display() {
        let id: HistoryId = " 1700000000123 ".parse().unwrap();
        assert_eq!(format!("{}", id), "1700000000123");
        assert!("abc".parse::<HistoryId>().is_err());
    }
}
