use rusqlite::{Connection, OptionalExtension, Result};
use tracing::{debug, info};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    info!(version, "{}", message);
    Ok(())
}

/// Create the ledger table with the current schema.
fn create_work_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS work_events (
            record_id    TEXT PRIMARY KEY CHECK(length(record_id) = 14),
            company_id   TEXT NOT NULL,
            member_id    TEXT NOT NULL,
            category     INTEGER NOT NULL CHECK(category IN (1,2,3,4) OR category >= 90),
            event_date   TEXT NOT NULL,
            event_time   TEXT NOT NULL,
            inserted_at  TEXT NOT NULL,
            latitude     TEXT,
            longitude    TEXT,
            comment      TEXT,
            updated      INTEGER NOT NULL DEFAULT 0,
            recorded_at  TEXT NOT NULL,
            linked_date  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_work_events_member_order
            ON work_events(company_id, member_id, linked_date, event_date, event_time);
        "#,
    )?;
    Ok(())
}

/// Backing store of the sequence allocator.
fn create_sequences_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sequences (
            name   TEXT PRIMARY KEY,
            value  INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// At most one holiday-class row per member and linked day, enforced by the store.
fn migrate_holiday_unique_index(conn: &Connection) -> Result<()> {
    let version = "20251104_0002_holiday_unique_per_linked_day";
    if is_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uq_work_events_holiday_day
            ON work_events(company_id, member_id, linked_date)
            WHERE category >= 90;
        "#,
    )?;

    mark_applied(
        conn,
        version,
        "Added unique holiday index on (company_id, member_id, linked_date)",
    )
}

/// Databases created before `inserted_at` existed only had `recorded_at`.
fn migrate_add_inserted_at(conn: &Connection) -> Result<()> {
    let version = "20251112_0003_add_inserted_at";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !has_column(conn, "work_events", "inserted_at")? {
        conn.execute_batch(
            r#"
            ALTER TABLE work_events ADD COLUMN inserted_at TEXT NOT NULL DEFAULT '';
            UPDATE work_events SET inserted_at = recorded_at WHERE inserted_at = '';
            "#,
        )?;
    }

    mark_applied(conn, version, "Added inserted_at to work_events")
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base tables
    if !table_exists(conn, "work_events")? {
        create_work_events_table(conn)?;
        info!("Created work_events table");
    } else {
        debug!("work_events table present");
    }
    create_sequences_table(conn)?;

    // 3) Versioned steps, in order
    migrate_add_inserted_at(conn)?;
    migrate_holiday_unique_index(conn)?;

    Ok(())
}
