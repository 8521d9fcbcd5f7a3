//! Linked-Date Reconciler: which business day an event belongs to, and the
//! calendar arithmetic around month views.

use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::work_event::WorkEvent;
use crate::utils::date::{
    compact, day_before, first_of_month, moment_key, month_prefix, next_month, parse_compact_date,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Linked date for an event reported without one (legacy clients).
///
/// Anything but a `Start` dated away from the prior event's linked day
/// continues that day's shift, typically past midnight.
pub fn derive_linked_date(category: Category, event_date: &str, prior: Option<&WorkEvent>) -> String {
    match prior {
        Some(p) if category != Category::Start && event_date != p.linked_date => {
            p.linked_date.clone()
        }
        _ => event_date.to_string(),
    }
}

/// True when the member's shift is still open more than a day after its
/// latest event. `now` is shifted by `clock_offset_hours` before comparing.
pub fn open_shift_overdue(
    latest: Option<&WorkEvent>,
    now: NaiveDateTime,
    clock_offset_hours: i64,
) -> bool {
    let Some(latest) = latest else {
        return false;
    };
    if latest.category == Category::End {
        return false;
    }

    let Ok(date) = parse_compact_date(&latest.event_date) else {
        return false;
    };
    let Some(next_day) = date.succ_opt() else {
        return false;
    };

    let deadline = format!("{}{}", compact(next_day), latest.event_time);
    let shifted_now = moment_key(now + Duration::hours(clock_offset_hours));
    deadline < shifted_now
}

/// Boundaries of one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    /// `YYYYMM`
    pub prefix: String,
    /// Last day of the previous month (`YYYYMMDD`); the previous event is the
    /// newest one linked on or before it.
    pub prev_boundary: String,
    /// First day of the following month (`YYYYMMDD`); the next event is the
    /// oldest one linked on or after it.
    pub next_boundary: String,
}

impl MonthWindow {
    /// `month` is `YYYYMM` / `YYYY-MM`; the month of `today` when absent.
    pub fn new(month: Option<&str>, today: NaiveDate) -> AppResult<Self> {
        let prefix = month_prefix(month, today)?;
        let first = first_of_month(&prefix)?;

        Ok(Self {
            prev_boundary: compact(day_before(first)?),
            next_boundary: compact(next_month(first)?),
            prefix,
        })
    }
}
