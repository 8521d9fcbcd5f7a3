//! Transition Validator.
//!
//! Decides whether an ordinary event may follow the member's latest event.
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. temporal ordering on the `event_date + event_time` string key
//! 2. linked-day ordering
//! 3. category adjacency, keyed by the latest category

use crate::models::category::Category;
use crate::models::outcome::MismatchKind;
use crate::models::work_event::WorkEvent;

/// The normalized fields of an event about to be appended.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub category: Category,
    /// `YYYYMMDD`
    pub event_date: &'a str,
    /// `HHMM`
    pub event_time: &'a str,
    /// `YYYYMMDD`
    pub linked_date: &'a str,
}

impl Candidate<'_> {
    pub fn moment_key(&self) -> String {
        format!("{}{}", self.event_date, self.event_time)
    }
}

/// `Ok(())` when `cand` may be appended after `latest`.
pub fn check_transition(latest: Option<&WorkEvent>, cand: &Candidate) -> Result<(), MismatchKind> {
    let Some(latest) = latest else {
        return Ok(());
    };

    // Both keys are fixed-width digits, so string order is time order.
    if cand.moment_key() <= latest.moment_key() {
        return Err(MismatchKind::OutOfOrder);
    }

    if latest.linked_date.as_str() > cand.linked_date {
        return Err(MismatchKind::LinkedDayRegression);
    }

    if !adjacency_allows(Some(latest.category), cand.category) {
        return Err(MismatchKind::CategoryAdjacency);
    }

    Ok(())
}

/// Category adjacency table.
pub fn adjacency_allows(latest: Option<Category>, next: Category) -> bool {
    use Category::*;

    match latest {
        None => true,
        Some(Start) | Some(ReturnToSeat) => !matches!(next, Start | ReturnToSeat),
        Some(StepAway) => !matches!(next, Start | StepAway),
        Some(End) => !matches!(next, StepAway | ReturnToSeat | End),
        Some(Holiday(_)) => true,
    }
}
