//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Business-rule rejections (mismatch) and missing records are NOT errors:
//! they are reported through `models::outcome::Outcome`.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// A ledger store operation failed. `op` names the operation for diagnosis.
    #[error("Store error in {op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Sequence allocation failed: {0}")]
    Allocator(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Format errors (rejected before any store access)
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Malformed client input (date, time, category, id).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDate(_)
                | AppError::InvalidTime(_)
                | AppError::InvalidCategory(_)
                | AppError::InvalidRecordId(_)
        )
    }

    /// Store or allocator failure: "the system failed", as opposed to
    /// "your input conflicts with existing data".
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            AppError::Store { .. } | AppError::Db(_) | AppError::Allocator(_)
        )
    }

    /// Text safe to hand to an end client. Store internals are never included.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Store { op, .. } => format!("Unknown error ({op})"),
            AppError::Allocator(_) => "Unknown error (allocate_sequence)".to_string(),
            AppError::Db(_) | AppError::Io(_) | AppError::Migration(_) => {
                "Unknown error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Attach the name of the ledger operation to a rusqlite failure.
pub trait StoreContext<T> {
    fn op(self, name: &'static str) -> AppResult<T>;
}

impl<T> StoreContext<T> for rusqlite::Result<T> {
    fn op(self, name: &'static str) -> AppResult<T> {
        self.map_err(|source| {
            tracing::error!(op = name, error = %source, "SQL query error");
            AppError::Store { op: name, source }
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
