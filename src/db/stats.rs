use crate::db::pool::DbPool;
use crate::db::queries::count_events;
use crate::errors::{AppResult, StoreContext};
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::parse_compact_date;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    let count = count_events(&pool.conn)?;
    println!("{}• Total events:{} {}{}{}", CYAN, RESET, GREEN, count, RESET);

    let members: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM (SELECT DISTINCT company_id, member_id FROM work_events)",
            [],
            |row| row.get(0),
        )
        .op("count_members")?;
    println!("{}• Members:{} {}", CYAN, RESET, members);

    //
    // 3) LINKED DATE RANGE
    //
    let range: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row(
            "SELECT MIN(linked_date), MAX(linked_date) FROM work_events",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .op("linked_date_range")?;
    let (first_date, last_date) = range.unwrap_or((None, None));

    let fmt_first = first_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date
        .clone()
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Linked date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE EVENTS/DAY
    //
    if let (Some(f), Some(l)) = (first_date, last_date) {
        let d1 = parse_compact_date(&f)?;
        let d2 = parse_compact_date(&l)?;
        let days = (d2 - d1).num_days().max(1);

        let avg = count as f64 / days as f64;
        println!("{}• Average events/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
