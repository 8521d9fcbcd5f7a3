//! Sequence Allocator.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::debug;

/// Source of the numeric tail of a record id. Must never hand out the same
/// value twice, whatever the interleaving of callers.
pub trait SequenceAllocator {
    fn next_sequence(&self, conn: &Connection) -> AppResult<u64>;
}

/// Counter kept in the `sequences` table.
///
/// The increment is a single upsert executed on the caller's connection. Run
/// inside a `BEGIN IMMEDIATE` transaction it is serialized with every other
/// writer, and rolled back together with the insert it was allocated for.
#[derive(Debug, Clone)]
pub struct TableSequence {
    name: String,
}

impl TableSequence {
    pub const DEFAULT_NAME: &'static str = "work_events";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Default for TableSequence {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl SequenceAllocator for TableSequence {
    fn next_sequence(&self, conn: &Connection) -> AppResult<u64> {
        let value: i64 = conn
            .query_row(
                "INSERT INTO sequences (name, value) VALUES (?1, 1)
                 ON CONFLICT(name) DO UPDATE SET value = value + 1
                 RETURNING value",
                [&self.name],
                |row| row.get(0),
            )
            .map_err(|e| {
                tracing::error!(op = "allocate_sequence", error = %e, "SQL query error");
                AppError::Allocator(e.to_string())
            })?;

        debug!(sequence = %self.name, value, "allocated");
        u64::try_from(value).map_err(|_| AppError::Allocator(format!("negative sequence {value}")))
    }
}
