use crate::errors::{AppResult, StoreContext};
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write one line of the audit trail into the `log` table.
///
/// Called inside the same transaction as the mutation it describes.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .op("write_log")?;

    stmt.execute(params![now, operation, target, message])
        .op("write_log")?;

    Ok(())
}
