use crate::core::clock::Clock;
use crate::core::ledger::Ledger;
use crate::db::pool::DbPool;
use crate::db::sequence::SequenceAllocator;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::write_rows;
use crate::export::model::rows_from_view;
use crate::ui::messages::{info, success, warning};
use std::env;
use std::path::PathBuf;
use tracing::info as trace_info;

/// High-level export of one member's month view.
pub struct ExportLogic;

fn explicit_target(file: &str) -> AppResult<PathBuf> {
    let path = PathBuf::from(file);
    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "Output file path must be absolute: {file}"
        )));
    }
    Ok(path)
}

impl ExportLogic {
    /// Write the stitched month view (previous event, month, next event) of a
    /// member. An explicit `file` must be absolute. Returns the number of rows
    /// written.
    #[allow(clippy::too_many_arguments)]
    pub fn export<A: SequenceAllocator, C: Clock>(
        ledger: &Ledger<A, C>,
        pool: &DbPool,
        company_id: &str,
        member_id: &str,
        month: Option<&str>,
        format: ExportFormat,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let explicit = file.map(explicit_target).transpose()?;

        let view = ledger.month_view(pool, company_id, member_id, month)?;
        let rows = rows_from_view(&view);

        if rows.is_empty() {
            warning(format!(
                "No events found for {company_id}/{member_id} in {}.",
                view.month
            ));
            return Ok(0);
        }

        // without --file the export lands in the working directory
        let path = match explicit {
            Some(p) => p,
            None => env::current_dir()?.join(format.default_file_name(
                company_id,
                member_id,
                &view.month,
            )),
        };
        ensure_writable(&path, force)?;

        info(format!("Exporting to {}: {}", format.label(), path.display()));
        write_rows(format, &rows, &path)?;
        success(format!(
            "{} export completed: {} ({} rows)",
            format.label(),
            path.display(),
            rows.len()
        ));

        trace_info!(format = format.as_str(), rows = rows.len(), month = %view.month, "month view exported");
        Ok(rows.len())
    }
}
