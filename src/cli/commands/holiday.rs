use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::payload::{HolidayPayload, HolidayUpdate};
use crate::models::record_id::RecordId;
use crate::ui::render::{emit_json, print_outcome};

/// Handle `holiday` (register, or update with `--record`).
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let ledger = Ledger::system();

    let (action, outcome) = match cmd {
        Commands::Holiday {
            record: Some(id),
            category,
            comment,
            ..
        } => {
            let update = HolidayUpdate {
                record_id: RecordId::parse(id)?,
                category: *category,
                comment: comment.clone(),
            };
            let mut pool = open_pool(cfg)?;
            ("Holiday updated", ledger.update_holiday(&mut pool, &update)?)
        }

        Commands::Holiday {
            record: None,
            company,
            member,
            linked,
            category,
            comment,
        } => {
            let (Some(company), Some(member), Some(linked)) = (company, member, linked) else {
                return Err(AppError::Config(
                    "--company, --member and --linked are required without --record".into(),
                ));
            };
            let payload = HolidayPayload {
                member_id: member.clone(),
                category: *category,
                linked_date: linked.clone(),
                comment: comment.clone(),
            };
            let mut pool = open_pool(cfg)?;
            (
                "Holiday registered",
                ledger.register_holiday(&mut pool, company, &payload)?,
            )
        }

        _ => return Ok(()),
    };

    if json {
        emit_json(&outcome)
    } else {
        print_outcome(action, &outcome);
        Ok(())
    }
}
