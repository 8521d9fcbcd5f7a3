//! Holiday/Attendance Overlay: a linked day holds either one holiday row or
//! any number of ordinary events, never both.

use crate::db::queries::{first_on_linked_date, holiday_on_linked_date};
use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// False if anything at all is already recorded for the linked day.
pub fn can_insert_holiday(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    linked_date: &str,
) -> AppResult<bool> {
    let existing = first_on_linked_date(conn, company_id, member_id, linked_date)?;
    if let Some(ev) = &existing {
        debug!(record_id = %ev.record_id, linked_date, "linked day already in use");
    }
    Ok(existing.is_none())
}

/// False if the linked day is already taken by a holiday. Ordinary events
/// coexist with each other.
pub fn can_insert_ordinary(
    conn: &Connection,
    company_id: &str,
    member_id: &str,
    linked_date: &str,
) -> AppResult<bool> {
    let holiday = holiday_on_linked_date(conn, company_id, member_id, linked_date)?;
    if let Some(ev) = &holiday {
        debug!(record_id = %ev.record_id, linked_date, "holiday on linked day");
    }
    Ok(holiday.is_none())
}
