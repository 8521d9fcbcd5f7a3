#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::fs;
use std::path::PathBuf;
use twledger::core::clock::FixedClock;
use twledger::core::ledger::Ledger;
use twledger::db::initialize::init_db;
use twledger::db::pool::DbPool;
use twledger::db::sequence::TableSequence;
use twledger::models::category::Category;
use twledger::models::outcome::Outcome;
use twledger::models::payload::ReportPayload;

pub const COMPANY: &str = "acme";
pub const MEMBER: &str = "m001";

pub fn twl() -> Command {
    cargo_bin_cmd!("twledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_twledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a file DB through the CLI (creates tables, no config file)
pub fn init_test_db(db_path: &str) {
    twl()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
        .expect("valid test moment")
}

pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date")
}

/// Migrated in-memory store.
pub fn mem_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    init_db(&pool.conn).expect("schema");
    pool
}

/// Ledger whose clock is frozen at 2025-10-30 10:00.
pub fn ledger() -> Ledger<TableSequence, FixedClock> {
    ledger_at(at("2025-10-30", "10:00"))
}

pub fn ledger_at(now: NaiveDateTime) -> Ledger<TableSequence, FixedClock> {
    Ledger::new(TableSequence::default(), FixedClock(now))
}

/// `ReportPayload` for `MEMBER`, linked to `linked`.
pub fn event(category: Category, date: &str, time: &str, linked: &str) -> ReportPayload {
    ReportPayload::new(MEMBER, category, date, time).linked_to(linked)
}

/// Report through the validated path and return the outcome.
pub fn report(
    ledger: &Ledger<TableSequence, FixedClock>,
    pool: &mut DbPool,
    category: Category,
    date: &str,
    time: &str,
    linked: &str,
) -> Outcome {
    ledger
        .report(pool, COMPANY, &event(category, date, time, linked))
        .expect("report should not fail")
}

pub fn count_rows(pool: &DbPool, table: &str) -> i64 {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("count")
}
