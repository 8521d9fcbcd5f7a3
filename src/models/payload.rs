//! Inbound payloads, as submitted by the client. Dates and times are still
//! raw strings here; `utils::date` normalizes them before any store access.

use super::{category::Category, record_id::RecordId};
use serde::Deserialize;

/// A work-status report (start / step-away / return-to-seat / end).
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPayload {
    pub member_id: String,
    pub category: Category,
    /// `YYYY-MM-DD` (or deprecated `YYYY.MM.DD`)
    pub date: String,
    /// `HH:MM`
    pub time: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// `YYYYMMDD`. Required by the current path; derived by the legacy one.
    #[serde(default)]
    pub linked_date: Option<String>,
    #[serde(default)]
    pub updated: Option<bool>,
}

impl ReportPayload {
    pub fn new(member_id: &str, category: Category, date: &str, time: &str) -> Self {
        Self {
            member_id: member_id.to_string(),
            category,
            date: date.to_string(),
            time: time.to_string(),
            latitude: None,
            longitude: None,
            comment: None,
            linked_date: None,
            updated: None,
        }
    }

    pub fn linked_to(mut self, linked_date: &str) -> Self {
        self.linked_date = Some(linked_date.to_string());
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn at(mut self, latitude: &str, longitude: &str) -> Self {
        self.latitude = Some(latitude.to_string());
        self.longitude = Some(longitude.to_string());
        self
    }
}

/// Operator correction of an existing row.
#[derive(Debug, Clone, Deserialize)]
pub struct EditPayload {
    pub record_id: RecordId,
    pub category: Category,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Registration of a holiday/leave day.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayPayload {
    pub member_id: String,
    pub category: Category,
    /// `YYYYMMDD`
    pub linked_date: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Change of an existing holiday row.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayUpdate {
    pub record_id: RecordId,
    pub category: Category,
    #[serde(default)]
    pub comment: Option<String>,
}
