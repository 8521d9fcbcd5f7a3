//! Text and JSON rendering of ledger results.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::month_view::MonthView;
use crate::models::outcome::{MismatchKind, Outcome};
use crate::models::work_event::WorkEvent;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREY, RESET, colorize_category};
use crate::utils::date::month_label;
use crate::utils::table::{Column, Table};
use serde::Serialize;

pub fn emit_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
    println!("{out}");
    Ok(())
}

fn describe_mismatch(kind: MismatchKind) -> &'static str {
    match kind {
        MismatchKind::OutOfOrder => "the event is not later than the latest recorded event",
        MismatchKind::LinkedDayRegression => {
            "the event is linked to an earlier day than the latest recorded event"
        }
        MismatchKind::CategoryAdjacency => "this status cannot follow the latest status",
        MismatchKind::HolidayConflict => "a holiday and work events cannot share the same day",
    }
}

fn latest_label(latest: Option<Category>) -> String {
    match latest {
        Some(c) => colorize_category(c),
        None => format!("{GREY}none{RESET}"),
    }
}

/// One-line report of a mutation result.
pub fn print_outcome(action: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Accepted(applied) => {
            success(format!("{action}: {}", applied.record_id));
            info(format!(
                "Latest status: {}",
                latest_label(applied.latest_category)
            ));
        }
        Outcome::Mismatch(m) => {
            warning(format!("{}: {}", m.reason, describe_mismatch(m.detail)));
        }
        Outcome::NotFound { record_id } => {
            warning(format!("Record {record_id} not found."));
        }
    }
}

fn row(ev: &WorkEvent) -> Vec<String> {
    vec![
        ev.record_id.to_string(),
        ev.linked_date.clone(),
        ev.display_moment(),
        ev.category.to_string(),
        if ev.updated { "*" } else { "" }.to_string(),
        ev.comment.clone().unwrap_or_default(),
    ]
}

fn event_table() -> Table {
    Table::new(vec![
        Column::new("RECORD"),
        Column::new("LINKED"),
        Column::new("MOMENT"),
        Column::new("STATUS"),
        Column::new("UPD"),
        Column::new("COMMENT"),
    ])
}

pub fn print_events(events: &[&WorkEvent]) {
    let mut table = event_table();
    for ev in events {
        table.add_row(row(ev));
    }
    print!("{}", table.render());
}

pub fn print_month(view: &MonthView) {
    println!("📅 {}", month_label(&view.month));

    if view.is_empty() {
        println!("{GREY}No events.{RESET}");
        return;
    }

    print_events(&view.stitched());
}
