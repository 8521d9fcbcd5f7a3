use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::fill_missing_keys;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::path::Path;
use std::process::Command;

/// `$EDITOR`, then `$VISUAL`, then the platform default.
fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

fn edit(path: &Path, preferred: Option<&str>) {
    let fallback = default_editor();
    let editor = preferred.unwrap_or(fallback.as_str());

    if run_editor(editor, path) {
        success(format!("Configuration file edited with '{editor}'"));
        return;
    }
    if editor == fallback {
        error(format!("Failed to edit the configuration file with '{editor}'"));
        return;
    }

    warning(format!("Editor '{editor}' not available, falling back to '{fallback}'"));
    if run_editor(&fallback, path) {
        success(format!("Configuration file edited with '{fallback}'"));
    } else {
        error(format!("Failed to edit the configuration file with '{fallback}'"));
    }
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();
    let file_present = path.exists();
    if (*check || *migrate || *edit_config) && !file_present {
        warning(format!(
            "No configuration file at {} (run `twledger init`)",
            path.display()
        ));
    }

    if *print_config {
        println!("📄 Effective configuration:\n");
        println!("{}", cfg.to_yaml()?);
    }

    if *check && file_present {
        let missing = Config::missing_keys(&path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("Missing keys: {}", missing.join(", ")));
        }
    }

    if *migrate && file_present {
        let added = fill_missing_keys(&path)?;
        if added.is_empty() {
            info("Configuration file already up to date.");
        } else {
            success(format!("Added keys: {}", added.join(", ")));
        }
    }

    if *edit_config && file_present {
        edit(&path, editor.as_deref());
    }

    Ok(())
}
