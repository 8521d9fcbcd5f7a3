//! Event Store Adapter: every statement that touches `work_events`.
//!
//! Functions take a plain `&Connection` so that they run unchanged inside a
//! write transaction (`Transaction` derefs to `Connection`).

use crate::errors::{AppError, AppResult, StoreContext};
use crate::models::category::Category;
use crate::models::record_id::RecordId;
use crate::models::work_event::{SENTINEL_DATE, WorkEvent};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use tracing::debug;

const COLUMNS: &str = "record_id, company_id, member_id, category, event_date, event_time, \
     linked_date, latitude, longitude, comment, updated, inserted_at, recorded_at";

/// Newest first, by reporting day then event moment.
const LATEST_ORDER: &str = "ORDER BY linked_date DESC, event_date DESC, event_time DESC";
const CHRONO_ORDER: &str = "ORDER BY linked_date ASC, event_date ASC, event_time ASC";

pub fn map_row(row: &Row) -> Result<WorkEvent> {
    let id_str: String = row.get("record_id")?;
    let record_id = RecordId::parse(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
    })?;

    let code: i64 = row.get("category")?;
    let category = u16::try_from(code)
        .ok()
        .and_then(Category::from_code)
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Integer,
                Box::new(AppError::InvalidCategory(code.to_string())),
            )
        })?;

    Ok(WorkEvent {
        record_id,
        company_id: row.get("company_id")?,
        member_id: row.get("member_id")?,
        category,
        event_date: row.get("event_date")?,
        event_time: row.get("event_time")?,
        linked_date: row.get("linked_date")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        comment: row.get("comment")?,
        updated: row.get::<_, i64>("updated")? == 1,
        inserted_at: row.get("inserted_at")?,
        recorded_at: row.get("recorded_at")?,
    })
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<WorkEvent>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Up to `limit` most recent events of a member, sentinel rows excluded.
pub fn select_latest(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    limit: usize,
) -> AppResult<Vec<WorkEvent>> {
    debug!(company_id, member_id, limit, "select latest events");
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND event_date <> ?3
         {LATEST_ORDER} LIMIT ?4"
    );
    let limit = limit as i64;
    collect(conn, &sql, params![company_id, member_id, SENTINEL_DATE, limit])
        .op("select_latest")
}

pub fn latest_event(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
) -> AppResult<Option<WorkEvent>> {
    Ok(select_latest(conn, company_id, member_id, 1)?.into_iter().next())
}

pub fn insert_event(conn: &Connection, ev: &WorkEvent) -> AppResult<usize> {
    debug!(record_id = %ev.record_id, category = ev.category.code(), "insert event");
    let mut stmt = conn
        .prepare_cached(&format!(
            "INSERT INTO work_events ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ))
        .op("insert_event")?;

    stmt.execute(params![
        ev.record_id.as_str(),
        ev.company_id,
        ev.member_id,
        ev.category.code(),
        ev.event_date,
        ev.event_time,
        ev.linked_date,
        ev.latitude,
        ev.longitude,
        ev.comment,
        ev.updated as i64,
        ev.inserted_at,
        ev.recorded_at,
    ])
    .op("insert_event")
}

/// Overwrite the mutable columns of an existing row. `record_id`, owner,
/// `linked_date` and `inserted_at` are left alone.
pub fn update_event(conn: &Connection, ev: &WorkEvent) -> AppResult<usize> {
    debug!(record_id = %ev.record_id, "update event");
    conn.execute(
        "UPDATE work_events SET
            event_date = ?1,
            event_time = ?2,
            latitude = ?3,
            longitude = ?4,
            comment = ?5,
            updated = ?6,
            recorded_at = ?7,
            category = ?8
         WHERE record_id = ?9",
        params![
            ev.event_date,
            ev.event_time,
            ev.latitude,
            ev.longitude,
            ev.comment,
            ev.updated as i64,
            ev.recorded_at,
            ev.category.code(),
            ev.record_id.as_str(),
        ],
    )
    .op("update_event")
}

pub fn delete_event(conn: &Connection, record_id: &RecordId) -> AppResult<usize> {
    debug!(%record_id, "delete event");
    conn.execute(
        "DELETE FROM work_events WHERE record_id = ?1",
        [record_id.as_str()],
    )
    .op("delete_event")
}

pub fn load_event(conn: &Connection, record_id: &RecordId) -> AppResult<Option<WorkEvent>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM work_events WHERE record_id = ?1"),
        [record_id.as_str()],
        map_row,
    )
    .optional()
    .op("load_event")
}

/// All events whose `linked_date` starts with `prefix` (`YYYYMM`), oldest first.
pub fn select_by_linked_month(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    prefix: &str,
) -> AppResult<Vec<WorkEvent>> {
    debug!(company_id, member_id, prefix, "select month");
    let pattern = format!("{prefix}%");
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND linked_date LIKE ?3
         {CHRONO_ORDER}"
    );
    collect(conn, &sql, params![company_id, member_id, pattern]).op("select_by_linked_month")
}

/// Newest event linked on or before `boundary` (`YYYYMMDD`).
pub fn select_prev(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    boundary: &str,
) -> AppResult<Option<WorkEvent>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND linked_date <= ?3
         {LATEST_ORDER} LIMIT 1"
    );
    conn.query_row(&sql, params![company_id, member_id, boundary], map_row)
        .optional()
        .op("select_prev")
}

/// Oldest event linked on or after `boundary` (`YYYYMMDD`).
pub fn select_next(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    boundary: &str,
) -> AppResult<Option<WorkEvent>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND linked_date >= ?3
         {CHRONO_ORDER} LIMIT 1"
    );
    conn.query_row(&sql, params![company_id, member_id, boundary], map_row)
        .optional()
        .op("select_next")
}

/// Earliest row attributed to a linked day. Holiday rows carry the sentinel
/// date and therefore come first.
pub fn first_on_linked_date(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    linked_date: &str,
) -> AppResult<Option<WorkEvent>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND linked_date = ?3
         ORDER BY event_date ASC, event_time ASC LIMIT 1"
    );
    conn.query_row(&sql, params![company_id, member_id, linked_date], map_row)
        .optional()
        .op("first_on_linked_date")
}

/// Holiday-class row on a linked day, if any.
pub fn holiday_on_linked_date(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    linked_date: &str,
) -> AppResult<Option<WorkEvent>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM work_events
         WHERE company_id = ?1 AND member_id = ?2 AND linked_date = ?3 AND category >= ?4
         LIMIT 1"
    );
    conn.query_row(
        &sql,
        params![
            company_id,
            member_id,
            linked_date,
            crate::models::category::HOLIDAY_THRESHOLD
        ],
        map_row,
    )
    .optional()
    .op("holiday_on_linked_date")
}

/// Total ledger rows, for `db --info`.
pub fn count_events(conn: &Connection) -> AppResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM work_events", [], |row| row.get(0))
        .op("count_events")
}
