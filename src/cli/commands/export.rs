use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        who,
        month,
        format,
        file,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        ExportLogic::export(
            &Ledger::system(),
            &pool,
            &who.company,
            &who.member,
            month.as_deref(),
            *format,
            file.as_deref(),
            *force,
        )?;
    }

    Ok(())
}
