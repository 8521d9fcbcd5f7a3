use super::{category::Category, record_id::RecordId};
use serde::Serialize;

/// Why a candidate event was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Candidate moment is at or before the latest known event.
    OutOfOrder,
    /// Candidate is attributed to an earlier business day than the latest event.
    LinkedDayRegression,
    /// Candidate category cannot follow the latest category.
    CategoryAdjacency,
    /// Holiday and ordinary events collide on the same linked day.
    HolidayConflict,
}

/// Structured business-rule rejection. Expected outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub rejected: bool,
    pub reason: &'static str,
    pub detail: MismatchKind,
}

impl Mismatch {
    pub fn new(detail: MismatchKind) -> Self {
        Self {
            rejected: true,
            reason: "Mismatch",
            detail,
        }
    }
}

/// A write that went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub record_id: RecordId,
    /// Rows touched by the write.
    pub affected: usize,
    /// Member's latest category recomputed after the write; `None` when no
    /// events remain.
    pub latest_category: Option<Category>,
}

/// Result of every mutating ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Accepted(Applied),
    Mismatch(Mismatch),
    NotFound { record_id: RecordId },
}

impl Outcome {
    pub fn mismatch(detail: MismatchKind) -> Self {
        Outcome::Mismatch(Mismatch::new(detail))
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Outcome::Mismatch(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound { .. })
    }

    pub fn applied(&self) -> Option<&Applied> {
        match self {
            Outcome::Accepted(a) => Some(a),
            _ => None,
        }
    }

    pub fn mismatch_kind(&self) -> Option<MismatchKind> {
        match self {
            Outcome::Mismatch(m) => Some(m.detail),
            _ => None,
        }
    }
}
