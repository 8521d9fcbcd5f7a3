use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::{init_db, is_initialized};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::{AppResult, StoreContext};
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn step(title: &str) {
    println!("{CYAN}▶ {title}…{RESET}");
}

fn done(msg: &str) {
    println!("{GREEN}✔ {msg}{RESET}\n");
}

fn failed(msg: &str, detail: &str) {
    println!("{RED}✘ {msg}:{RESET} {detail}\n");
}

fn check(pool: &DbPool) -> AppResult<()> {
    step("Running integrity check");

    let integrity: String = pool
        .conn
        .query_row("PRAGMA integrity_check;", [], |row| row.get(0))
        .op("integrity_check")?;
    if integrity == "ok" {
        done("Integrity check passed.");
    } else {
        failed("Integrity check failed", &integrity);
    }

    if !is_initialized(&pool.conn)? {
        failed("Ledger tables missing", "run `twledger db --migrate`");
    }
    Ok(())
}

/// Handle `db`. Steps run in a fixed order: migrate, info, check, vacuum.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check: run_check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;

    if *migrate {
        step("Running migrations");
        init_db(&pool.conn)?;
        done("Migration completed.");
    }

    if *info {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    if *run_check {
        check(&pool)?;
    }

    if *vacuum {
        step("Running VACUUM");
        pool.conn.execute_batch("VACUUM;").op("vacuum")?;
        done("Vacuum completed.");
    }

    Ok(())
}
