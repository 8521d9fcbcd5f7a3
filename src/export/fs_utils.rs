use crate::cli::commands::ask_confirmation;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use std::path::Path;

/// May `path` be (over)written? A missing parent directory is an error; an
/// existing file needs `force` or an interactive yes.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.is_dir()
    {
        return Err(AppError::Export(format!(
            "Directory does not exist: {}",
            dir.display()
        )));
    }

    if !path.exists() || force {
        return Ok(());
    }

    if ask_confirmation(&format!("The file '{}' already exists. Overwrite?", path.display())) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "Export cancelled: existing file not overwritten".into(),
        ))
    }
}
