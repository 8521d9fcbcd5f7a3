// src/export/model.rs

use crate::models::month_view::MonthView;
use crate::models::work_event::WorkEvent;
use serde::Serialize;

/// Flat row of an exported month view.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct EventExport {
    /// `prev`, `month` or `next`: where the row sits relative to the month.
    pub window: &'static str,
    pub record_id: String,
    pub company_id: String,
    pub member_id: String,
    pub category: u16,
    pub category_label: String,
    pub event_date: String,
    pub event_time: String,
    pub linked_date: String,
    pub latitude: String,
    pub longitude: String,
    pub comment: String,
    pub updated: bool,
    pub recorded_at: String,
}

impl EventExport {
    fn from_event(window: &'static str, ev: &WorkEvent) -> Self {
        Self {
            window,
            record_id: ev.record_id.to_string(),
            company_id: ev.company_id.clone(),
            member_id: ev.member_id.clone(),
            category: ev.category.code(),
            category_label: ev.category.to_string(),
            event_date: ev.event_date.clone(),
            event_time: ev.event_time.clone(),
            linked_date: ev.linked_date.clone(),
            latitude: ev.latitude.clone().unwrap_or_default(),
            longitude: ev.longitude.clone().unwrap_or_default(),
            comment: ev.comment.clone().unwrap_or_default(),
            updated: ev.updated,
            recorded_at: ev.recorded_at.clone(),
        }
    }
}

/// Rows in stitched order: previous event, the month, next event.
pub(crate) fn rows_from_view(view: &MonthView) -> Vec<EventExport> {
    let mut out = Vec::with_capacity(view.events.len() + 2);

    if let Some(ev) = &view.prev {
        out.push(EventExport::from_event("prev", ev));
    }
    out.extend(view.events.iter().map(|ev| EventExport::from_event("month", ev)));
    if let Some(ev) = &view.next {
        out.push(EventExport::from_event("next", ev));
    }

    out
}
