//! Month view export (CSV / JSON).

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use logic::ExportLogic;
pub use model::EventExport;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Name used in user messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    /// `<company>_<member>_<YYYYMM>.<ext>`, used when no `--file` is given.
    pub fn default_file_name(&self, company_id: &str, member_id: &str, month: &str) -> String {
        format!("{company_id}_{member_id}_{month}.{}", self.as_str())
    }
}
