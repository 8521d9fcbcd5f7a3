use crate::errors::{AppError, AppResult};
use crate::export::{EventExport, ExportFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn export_err(format: ExportFormat, what: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Export(format!("{} {what} error: {e}", format.label()))
}

fn write_json(rows: &[EventExport], path: &Path) -> AppResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, rows)
        .map_err(|e| export_err(ExportFormat::Json, "serialization", e))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Header row comes from the serde field names.
fn write_csv(rows: &[EventExport], path: &Path) -> AppResult<()> {
    let mut wtr =
        csv::Writer::from_path(path).map_err(|e| export_err(ExportFormat::Csv, "open", e))?;

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| export_err(ExportFormat::Csv, "write", e))?;
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn write_rows(format: ExportFormat, rows: &[EventExport], path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => write_csv(rows, path),
        ExportFormat::Json => write_json(rows, path),
    }
}
