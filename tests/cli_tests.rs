use predicates::str::contains;
use serde_json::Value;
use std::fs;

mod common;
use common::{init_test_db, setup_test_db, temp_out, twl};

/// Run a command against `db` with `--json` and parse its stdout.
fn json(db: &str, args: &[&str]) -> Value {
    let output = twl()
        .args(["--db", db, "--test", "--json"])
        .args(args)
        .output()
        .expect("failed to execute twledger");

    assert!(
        output.status.success(),
        "twledger {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn report(db: &str, category: &str, date: &str, time: &str, linked: &str) -> Value {
    json(
        db,
        &[
            "report", "-c", "acme", "-m", "m001", category, date, time, "--linked", linked,
        ],
    )
}

#[test]
fn test_init_creates_database() {
    let db = setup_test_db("cli_init");

    twl()
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db).exists());
}

#[test]
fn test_report_accepted_json() {
    let db = setup_test_db("cli_report_ok");
    init_test_db(&db);

    let v = report(&db, "start", "2025-10-28", "09:00", "20251028");
    assert_eq!(v["status"], "accepted");
    assert_eq!(v["affected"], 1);
    assert_eq!(v["latest_category"], 1);
    assert_eq!(v["record_id"].as_str().unwrap().len(), 14);
}

#[test]
fn test_report_mismatch_json() {
    let db = setup_test_db("cli_report_mismatch");
    init_test_db(&db);

    report(&db, "start", "2025-10-28", "09:00", "20251028");
    report(&db, "step-away", "2025-10-28", "12:00", "20251028");
    let v = report(&db, "1", "2025-10-28", "13:00", "20251028");

    assert_eq!(v["status"], "mismatch");
    assert_eq!(v["rejected"], true);
    assert_eq!(v["reason"], "Mismatch");
    assert_eq!(v["detail"], "category_adjacency");
}

#[test]
fn test_report_text_output() {
    let db = setup_test_db("cli_report_text");
    init_test_db(&db);

    twl()
        .args([
            "--db", &db, "--test", "report", "-c", "acme", "-m", "m001", "start", "2025-10-28",
            "09:00", "--linked", "20251028",
        ])
        .assert()
        .success()
        .stdout(contains("Reported"));
}

#[test]
fn test_invalid_date_fails() {
    let db = setup_test_db("cli_bad_date");
    init_test_db(&db);

    twl()
        .args([
            "--db", &db, "--test", "report", "-c", "acme", "-m", "m001", "start", "28/10/2025",
            "09:00", "--linked", "20251028",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_unknown_category_is_rejected_by_parser() {
    let db = setup_test_db("cli_bad_category");
    init_test_db(&db);

    twl()
        .args([
            "--db", &db, "--test", "report", "-c", "acme", "-m", "m001", "lunch", "2025-10-28",
            "09:00",
        ])
        .assert()
        .failure();
}

#[test]
fn test_latest_and_list_json() {
    let db = setup_test_db("cli_latest");
    init_test_db(&db);

    report(&db, "start", "2025-10-28", "09:00", "20251028");
    report(&db, "step-away", "2025-10-28", "12:00", "20251028");
    report(&db, "return", "2025-10-28", "13:00", "20251028");

    let latest = json(&db, &["latest", "-c", "acme", "-m", "m001"]);
    assert_eq!(latest["latest_category"], 3);
    assert_eq!(latest["events"].as_array().unwrap().len(), 1);

    let list = json(&db, &["latest", "-c", "acme", "-m", "m001", "--list"]);
    let events = list["events"].as_array().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["event_time"], "1300");

    let month = json(&db, &["list", "-c", "acme", "-m", "m001", "--month", "202510"]);
    assert_eq!(month["month"], "202510");
    assert_eq!(month["events"].as_array().unwrap().len(), 3);
    assert!(month["prev"].is_null());
    assert!(month["next"].is_null());
}

#[test]
fn test_latest_for_unknown_member() {
    let db = setup_test_db("cli_latest_empty");
    init_test_db(&db);

    let v = json(&db, &["latest", "-c", "acme", "-m", "nobody"]);
    assert!(v["latest_category"].is_null());
    assert_eq!(v["overdue"], false);
}

#[test]
fn test_edit_and_delete_json() {
    let db = setup_test_db("cli_edit_del");
    init_test_db(&db);

    report(&db, "start", "2025-10-28", "09:00", "20251028");
    let away = report(&db, "step-away", "2025-10-28", "12:00", "20251028");
    let id = away["record_id"].as_str().unwrap().to_string();

    let edited = json(
        &db,
        &["edit", "--record", &id, "end", "2025-10-28", "17:00", "--comment", "fixed"],
    );
    assert_eq!(edited["status"], "accepted");
    assert_eq!(edited["latest_category"], 4);

    let deleted = json(&db, &["del", &id, "--yes"]);
    assert_eq!(deleted["status"], "accepted");
    assert_eq!(deleted["latest_category"], 1);

    let again = json(&db, &["del", &id, "--yes"]);
    assert_eq!(again["status"], "not_found");
    assert_eq!(again["record_id"], id.as_str());
}

#[test]
fn test_holiday_blocks_the_day() {
    let db = setup_test_db("cli_holiday");
    init_test_db(&db);

    let h = json(
        &db,
        &["holiday", "-c", "acme", "-m", "m001", "--linked", "20251031", "91"],
    );
    assert_eq!(h["status"], "accepted");
    assert!(h["latest_category"].is_null());

    let v = report(&db, "start", "2025-10-31", "09:00", "20251031");
    assert_eq!(v["status"], "mismatch");
    assert_eq!(v["detail"], "holiday_conflict");

    let id = h["record_id"].as_str().unwrap().to_string();
    let d = json(&db, &["holiday-del", &id, "--yes"]);
    assert_eq!(d["status"], "accepted");
}

#[test]
fn test_report_legacy_derives_linked_day() {
    let db = setup_test_db("cli_legacy");
    init_test_db(&db);

    report(&db, "start", "2025-10-28", "22:00", "20251028");
    json(
        &db,
        &["report-legacy", "-c", "acme", "-m", "m001", "end", "2025-10-29", "02:00"],
    );

    let month = json(&db, &["list", "-c", "acme", "-m", "m001", "--month", "202510"]);
    let events = month["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["linked_date"], "20251028");
    assert_eq!(events[1]["event_date"], "20251029");
}

#[test]
fn test_export_csv_and_json() {
    let db = setup_test_db("cli_export");
    init_test_db(&db);

    report(&db, "start", "2025-10-28", "09:00", "20251028");
    report(&db, "end", "2025-10-28", "18:00", "20251028");

    let csv_out = temp_out("cli_export", "csv");
    twl()
        .args([
            "--db", &db, "--test", "export", "-c", "acme", "-m", "m001", "--month", "202510",
            "--format", "csv", "--file", &csv_out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&csv_out).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("window,record_id,company_id"));
    assert_eq!(lines.count(), 2);

    let json_out = temp_out("cli_export", "json");
    twl()
        .args([
            "--db", &db, "--test", "export", "-c", "acme", "-m", "m001", "--month", "202510",
            "--format", "json", "--file", &json_out,
        ])
        .assert()
        .success();

    let rows: Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["window"], "month");
    assert_eq!(rows[1]["category_label"], "end");
}

#[test]
fn test_export_default_file_name() {
    let db = setup_test_db("cli_export_default");
    init_test_db(&db);
    report(&db, "start", "2025-10-28", "09:00", "20251028");

    let dir = std::env::temp_dir().join("twledger_export_default");
    fs::create_dir_all(&dir).unwrap();
    let expected = dir.join("acme_m001_202510.json");
    fs::remove_file(&expected).ok();

    twl()
        .current_dir(&dir)
        .args([
            "--db", &db, "--test", "export", "-c", "acme", "-m", "m001", "--month", "2025-10",
            "--format", "json",
        ])
        .assert()
        .success()
        .stdout(contains("(1 rows)"));

    assert!(expected.exists());
}

#[test]
fn test_export_requires_absolute_path() {
    let db = setup_test_db("cli_export_rel");
    init_test_db(&db);

    twl()
        .args([
            "--db", &db, "--test", "export", "-c", "acme", "-m", "m001", "--file", "out.csv",
        ])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_log_print_shows_mutations() {
    let db = setup_test_db("cli_log");
    init_test_db(&db);

    let v = report(&db, "start", "2025-10-28", "09:00", "20251028");
    let id = v["record_id"].as_str().unwrap().to_string();

    twl()
        .args(["--db", &db, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("report"));

    twl()
        .args(["--db", &db, "--test", "log", "--print", "--record", &id])
        .assert()
        .success()
        .stdout(contains(id.as_str()));
}

#[test]
fn test_db_check_passes() {
    let db = setup_test_db("cli_db_check");
    init_test_db(&db);

    twl()
        .args(["--db", &db, "--test", "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}
