use crate::cli::commands::{ask_confirmation, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::models::record_id::RecordId;
use crate::ui::messages::info;
use crate::ui::render::{emit_json, print_outcome};

/// Handle `del` and `holiday-del`.
pub fn handle(cmd: &Commands, cfg: &Config, json: bool) -> AppResult<()> {
    if let Commands::Del { record, yes } | Commands::HolidayDel { record, yes } = cmd {
        let record_id = RecordId::parse(record)?;

        //
        // Confirmation prompt
        //
        if !*yes
            && !ask_confirmation(&format!(
                "Delete record {record_id}? This action is irreversible."
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        //
        // Execute deletion
        //
        let ledger = Ledger::system();
        let mut pool = open_pool(cfg)?;
        let (action, outcome) = if matches!(cmd, Commands::HolidayDel { .. }) {
            ("Holiday deleted", ledger.delete_holiday(&mut pool, &record_id)?)
        } else {
            ("Deleted", ledger.delete(&mut pool, &record_id)?)
        };

        if json {
            emit_json(&outcome)?;
        } else {
            print_outcome(action, &outcome);
        }
    }

    Ok(())
}
