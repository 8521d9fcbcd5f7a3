use crate::db::pool::DbPool;
use crate::errors::{AppResult, StoreContext};
use ansi_term::Colour;

/// Colour of an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "report" | "report_legacy" | "report_from_editor" => Colour::Green,
        "delete" | "holiday_del" => Colour::Red,
        "update" | "holiday_update" => Colour::Yellow,
        "holiday" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

const OP_WIDTH_MAX: usize = 40;

pub struct LogLogic;

impl LogLogic {
    /// Print the audit trail, oldest first. With `target`, only the lines
    /// about that record id.
    pub fn print_log(pool: &DbPool, target: Option<&str>) -> AppResult<()> {
        let mut stmt = pool
            .conn
            .prepare_cached(
                "SELECT id, date, operation, target, message FROM log
                 WHERE ?1 IS NULL OR target = ?1
                 ORDER BY id ASC",
            )
            .op("read_log")?;

        let rows = stmt
            .query_map([target], |row| {
                let id: i64 = row.get(0)?;
                let raw_date: String = row.get(1)?;
                let operation: String = row.get(2)?;
                let target: Option<String> = row.get(3)?;
                let message: String = row.get(4)?;

                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                Ok((id, date, operation, target.unwrap_or_default(), message))
            })
            .op("read_log")?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r.op("read_log")?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.len())
            .max()
            .unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op_label(op, target).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            let mut label = op_label(&operation, &target);
            if label.chars().count() > OP_WIDTH_MAX {
                label = label.chars().take(OP_WIDTH_MAX - 3).collect::<String>() + "...";
            }
            let padding = " ".repeat(op_w.saturating_sub(label.chars().count()));

            // only the operation word is coloured
            let colored = match label.split_once(' ') {
                Some((op_word, rest)) => {
                    format!("{} {}", color_for_operation(&operation).paint(op_word), rest)
                }
                None => color_for_operation(&operation).paint(label.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

fn op_label(operation: &str, target: &str) -> String {
    if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    }
}
