use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First wire code of the holiday/leave range.
pub const HOLIDAY_THRESHOLD: u16 = 90;

/// Kind of work-status transition carried by a ledger row.
///
/// Wire codes: `1=Start, 2=StepAway, 3=ReturnToSeat, 4=End`, and any code
/// `>= 90` for holiday/leave types (the sub-value is opaque here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Category {
    Start,
    StepAway,
    ReturnToSeat,
    End,
    Holiday(u16),
}

impl Category {
    /// Convert wire/DB code → enum
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Category::Start),
            2 => Some(Category::StepAway),
            3 => Some(Category::ReturnToSeat),
            4 => Some(Category::End),
            c if c >= HOLIDAY_THRESHOLD => Some(Category::Holiday(c)),
            _ => None,
        }
    }

    /// Convert enum → wire/DB code
    pub fn code(&self) -> u16 {
        match self {
            Category::Start => 1,
            Category::StepAway => 2,
            Category::ReturnToSeat => 3,
            Category::End => 4,
            Category::Holiday(c) => *c,
        }
    }

    /// Parse a code supplied by a client (CLI argument, JSON payload).
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        let by_name = match trimmed.to_lowercase().as_str() {
            "start" => Some(Category::Start),
            "stepaway" | "step-away" | "leave" => Some(Category::StepAway),
            "return" | "returntoseat" | "return-to-seat" | "seated" => {
                Some(Category::ReturnToSeat)
            }
            "end" => Some(Category::End),
            _ => None,
        };
        if let Some(c) = by_name {
            return Ok(c);
        }

        trimmed
            .parse::<u16>()
            .ok()
            .and_then(Category::from_code)
            .ok_or_else(|| AppError::InvalidCategory(raw.to_string()))
    }

    pub fn is_holiday(&self) -> bool {
        matches!(self, Category::Holiday(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Start => "start",
            Category::StepAway => "step-away",
            Category::ReturnToSeat => "return-to-seat",
            Category::End => "end",
            Category::Holiday(_) => "holiday",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Holiday(c) => write!(f, "holiday({c})"),
            other => f.write_str(other.label()),
        }
    }
}

impl TryFrom<u16> for Category {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Category::from_code(code).ok_or_else(|| format!("unknown category code {code}"))
    }
}

impl From<Category> for u16 {
    fn from(c: Category) -> Self {
        c.code()
    }
}
