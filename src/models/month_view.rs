use super::work_event::WorkEvent;
use serde::Serialize;

/// One month of a member's ledger plus the events just outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    /// `YYYYMM`
    pub month: String,
    /// Newest event linked before the month.
    pub prev: Option<WorkEvent>,
    /// Events linked inside the month, oldest first.
    pub events: Vec<WorkEvent>,
    /// Oldest event linked after the month.
    pub next: Option<WorkEvent>,
}

impl MonthView {
    /// Flat list: previous event, the month, next event.
    pub fn stitched(&self) -> Vec<&WorkEvent> {
        self.prev
            .iter()
            .chain(self.events.iter())
            .chain(self.next.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.events.is_empty() && self.next.is_none()
    }
}
