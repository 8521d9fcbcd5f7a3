use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, EventArgs};
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::outcome::Outcome;
use crate::models::payload::{EditPayload, ReportPayload};
use crate::models::record_id::RecordId;
use crate::ui::render::{emit_json, print_outcome};

fn payload(member: &str, event: &EventArgs) -> ReportPayload {
    ReportPayload {
        member_id: member.to_string(),
        category: event.category,
        date: event.date.clone(),
        time: event.time.clone(),
        latitude: event.latitude.clone(),
        longitude: event.longitude.clone(),
        comment: event.comment.clone(),
        linked_date: event.linked.clone(),
        updated: None,
    }
}

fn show(action: &str, outcome: &Outcome, json: bool) -> AppResult<()> {
    if json {
        emit_json(outcome)
    } else {
        print_outcome(action, outcome);
        Ok(())
    }
}

/// Handle `report`, `report-legacy` and `edit`.
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    let ledger = Ledger::system();

    match cmd {
        Commands::Report {
            who,
            event,
            updated,
        } => {
            let mut p = payload(&who.member, event);
            if *updated {
                p.updated = Some(true);
            }

            let mut pool = open_pool(cfg)?;
            let outcome = ledger.report(&mut pool, &who.company, &p)?;
            show("Reported", &outcome, json)
        }

        Commands::ReportLegacy { who, event } => {
            let p = payload(&who.member, event);
            let mut pool = open_pool(cfg)?;
            let outcome = ledger.report_legacy(&mut pool, &who.company, &p)?;
            show("Reported", &outcome, json)
        }

        Commands::Edit {
            record,
            company,
            member,
            event,
        } => {
            let outcome = match record {
                Some(id) => {
                    let edit = EditPayload {
                        record_id: RecordId::parse(id)?,
                        category: event.category,
                        date: event.date.clone(),
                        time: event.time.clone(),
                        latitude: event.latitude.clone(),
                        longitude: event.longitude.clone(),
                        comment: event.comment.clone(),
                    };
                    let mut pool = open_pool(cfg)?;
                    ledger.update(&mut pool, &edit)?
                }
                None => {
                    let (Some(company), Some(member)) = (company, member) else {
                        return Err(AppError::Config(
                            "--company and --member are required without --record".into(),
                        ));
                    };
                    let p = payload(member, event);
                    let mut pool = open_pool(cfg)?;
                    ledger.report_from_editor(&mut pool, company, &p)?
                }
            };
            show("Saved", &outcome, json)
        }

        _ => Ok(()),
    }
}
