use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RECORD_ID_LEN: usize = 14;

/// Ledger row identifier: `YYMMDDhhmm` followed by a 4-digit sequence tail.
///
/// Unique by construction (the tail comes from the sequence allocator) and
/// roughly time-sortable; ties inside one minute are broken by the tail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Build an identifier from the server clock and an allocated sequence.
    /// Only the last four digits of `seq` are kept.
    pub fn compose(now: NaiveDateTime, seq: u64) -> Self {
        let head = now.format("%y%m%d%H%M").to_string();
        RecordId(format!("{}{:04}", head, seq % 10_000))
    }

    /// Validate an identifier received from a caller.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let s = raw.trim();
        if s.len() != RECORD_ID_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::InvalidRecordId(raw.to_string()));
        }
        Ok(RecordId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYMMDDhhmm` head.
    pub fn stamp(&self) -> &str {
        &self.0[..10]
    }

    /// The 4-digit sequence tail.
    pub fn tail(&self) -> &str {
        &self.0[10..]
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = AppError;

    fn try_from(raw: String) -> AppResult<Self> {
        RecordId::parse(&raw)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
