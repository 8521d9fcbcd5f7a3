use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::work_event::WorkEvent;
use crate::ui::messages::{info, warning};
use crate::ui::render::{emit_json, print_events, print_month};
use crate::utils::colors::{GREY, RESET, colorize_category};
use serde::Serialize;

/// Latest status of a member as returned by `latest`.
#[derive(Serialize)]
struct LatestStatus<'a> {
    latest_category: Option<Category>,
    /// Shift still open more than a day after its latest event.
    overdue: bool,
    events: &'a [WorkEvent],
}

/// Handle `latest` and `list`.
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let ledger = Ledger::system();

    match cmd {
        Commands::Latest { who, list } => {
            let pool = open_pool(cfg)?;

            let events = if *list {
                ledger.latest_list(&pool, &who.company, &who.member)?
            } else {
                ledger.latest(&pool, &who.company, &who.member)?
                    .into_iter()
                    .collect()
            };
            let overdue = ledger.overdue(&pool, &who.company, &who.member, cfg.clock_offset_hours)?;

            let status = LatestStatus {
                latest_category: events.first().map(|ev| ev.category),
                overdue,
                events: &events,
            };

            if json {
                return emit_json(&status);
            }

            match status.latest_category {
                Some(c) => info(format!(
                    "{}/{}: {}",
                    who.company,
                    who.member,
                    colorize_category(c)
                )),
                None => println!("{GREY}No events for {}/{}.{RESET}", who.company, who.member),
            }
            if overdue {
                warning("Shift open for more than 24 hours.");
            }
            if !events.is_empty() {
                print_events(&events.iter().collect::<Vec<_>>());
            }
        }

        Commands::List { who, month } => {
            let pool = open_pool(cfg)?;
            let view = ledger.month_view(&pool, &who.company, &who.member, month.as_deref())?;

            if json {
                return emit_json(&view);
            }
            print_month(&view);
        }

        _ => {}
    }

    Ok(())
}
