use super::{category::Category, record_id::RecordId};
use serde::Serialize;

/// Reserved `event_date` meaning "not applicable / no data" (holiday rows).
pub const SENTINEL_DATE: &str = "00000000";
/// Reserved `event_time` meaning "not applicable / no data" (holiday rows).
pub const SENTINEL_TIME: &str = "0000";

/// One row of the ledger (`work_events` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkEvent {
    pub record_id: RecordId,     // ⇔ work_events.record_id (14 digits)
    pub company_id: String,      // ⇔ work_events.company_id
    pub member_id: String,       // ⇔ work_events.member_id
    pub category: Category,      // ⇔ work_events.category (INT code)
    pub event_date: String,      // ⇔ work_events.event_date ("YYYYMMDD")
    pub event_time: String,      // ⇔ work_events.event_time ("HHMM")
    pub linked_date: String,     // ⇔ work_events.linked_date ("YYYYMMDD")
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub comment: Option<String>,
    pub updated: bool,           // ⇔ work_events.updated (0/1)
    pub inserted_at: String,     // ⇔ work_events.inserted_at
    pub recorded_at: String,     // ⇔ work_events.recorded_at
}

impl WorkEvent {
    /// `event_date + event_time`: the fixed-width key the ordering checks
    /// compare lexicographically.
    pub fn moment_key(&self) -> String {
        format!("{}{}", self.event_date, self.event_time)
    }

    /// Holiday rows (and any other placeholder row) carry the sentinel date.
    pub fn is_sentinel(&self) -> bool {
        self.event_date == SENTINEL_DATE
    }

    /// `YYYY-MM-DD HH:MM` for human output; sentinel rows print as-is.
    pub fn display_moment(&self) -> String {
        if self.is_sentinel() || self.event_date.len() != 8 || self.event_time.len() != 4 {
            return format!("{} {}", self.event_date, self.event_time);
        }
        format!(
            "{}-{}-{} {}:{}",
            &self.event_date[..4],
            &self.event_date[4..6],
            &self.event_date[6..],
            &self.event_time[..2],
            &self.event_time[2..]
        )
    }
}
