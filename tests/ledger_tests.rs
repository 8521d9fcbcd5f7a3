use twledger::core::clock::FixedClock;
use twledger::core::ledger::Ledger;
use twledger::db::pool::DbPool;
use twledger::db::queries::load_event;
use twledger::db::sequence::TableSequence;
use twledger::errors::AppError;
use twledger::models::category::Category;
use twledger::models::outcome::{MismatchKind, Outcome};
use twledger::models::payload::{EditPayload, ReportPayload};
use twledger::models::record_id::RecordId;

mod common;
use common::{COMPANY, MEMBER, count_rows, event, ledger, mem_pool, report};

// ---------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------

#[test]
fn first_start_is_accepted() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let out = report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");

    let applied = out.applied().expect("accepted");
    assert_eq!(applied.affected, 1);
    assert_eq!(applied.latest_category, Some(Category::Start));
}

#[test]
fn step_away_then_second_start_is_mismatch() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let away = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "12:00", "20251028");
    assert!(away.is_accepted());

    let again = report(&ledger, &mut pool, Category::Start, "2025-10-28", "13:00", "20251028");
    assert!(again.is_mismatch());
    assert_eq!(again.mismatch_kind(), Some(MismatchKind::CategoryAdjacency));

    match again {
        Outcome::Mismatch(m) => {
            assert!(m.rejected);
            assert_eq!(m.reason, "Mismatch");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }

    assert_eq!(count_rows(&pool, "work_events"), 2);
}

#[test]
fn start_next_day_after_end_is_accepted() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    report(&ledger, &mut pool, Category::End, "2025-10-28", "18:00", "20251028");

    let out = report(&ledger, &mut pool, Category::Start, "2025-10-29", "09:00", "20251029");
    assert!(out.is_accepted());
}

#[test]
fn step_away_after_end_is_mismatch() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    report(&ledger, &mut pool, Category::End, "2025-10-28", "18:00", "20251028");

    let out = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "19:00", "20251028");
    assert_eq!(out.mismatch_kind(), Some(MismatchKind::CategoryAdjacency));
}

#[test]
fn deleting_the_only_event_leaves_no_latest_category() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let out = report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let id = out.applied().unwrap().record_id.clone();

    let del = ledger.delete(&mut pool, &id).unwrap();
    let applied = del.applied().expect("deleted");
    assert_eq!(applied.affected, 1);
    assert_eq!(applied.latest_category, None);
    assert!(ledger.latest(&pool, COMPANY, MEMBER).unwrap().is_none());
}

// ---------------------------------------------------------------
// General properties
// ---------------------------------------------------------------

#[test]
fn a_full_day_in_sequence_is_accepted() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let day = [
        (Category::Start, "09:00"),
        (Category::StepAway, "12:00"),
        (Category::ReturnToSeat, "13:00"),
        (Category::StepAway, "15:00"),
        (Category::ReturnToSeat, "15:30"),
        (Category::End, "18:00"),
    ];

    for (category, time) in day {
        let out = report(&ledger, &mut pool, category, "2025-10-28", time, "20251028");
        assert!(out.is_accepted(), "{category} at {time}");
        assert_eq!(out.applied().unwrap().latest_category, Some(category));
    }
}

#[test]
fn shift_spanning_midnight_keeps_its_linked_day() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "22:00", "20251028");
    let out = report(&ledger, &mut pool, Category::End, "2025-10-29", "02:00", "20251028");
    assert!(out.is_accepted());
}

#[test]
fn out_of_order_is_rejected_before_adjacency() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let out = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "08:59", "20251028");
    assert_eq!(out.mismatch_kind(), Some(MismatchKind::OutOfOrder));
}

#[test]
fn latest_round_trip_returns_inserted_event() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let out = report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let id = out.applied().unwrap().record_id.clone();

    let first = ledger.latest(&pool, COMPANY, MEMBER).unwrap().unwrap();
    let second = ledger.latest(&pool, COMPANY, MEMBER).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.record_id, id);
    assert_eq!(first.category, Category::Start);
    assert_eq!(first.event_date, "20251028");
    assert_eq!(first.event_time, "0900");
    assert_eq!(first.recorded_at, "2025/10/30 10:00:00.000");
}

#[test]
fn latest_is_idempotent_without_writes() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "12:00", "20251028");

    let latest = ledger.latest(&pool, COMPANY, MEMBER).unwrap();
    let list = ledger.latest_list(&pool, COMPANY, MEMBER).unwrap();

    assert_eq!(ledger.latest(&pool, COMPANY, MEMBER).unwrap(), latest);
    assert_eq!(ledger.latest_list(&pool, COMPANY, MEMBER).unwrap(), list);
    assert_eq!(list.first(), latest.as_ref());
    assert_eq!(count_rows(&pool, "work_events"), 2);
}

#[test]
fn record_ids_are_unique_and_well_formed() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let a = report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let b = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "10:00", "20251028");

    let a = a.applied().unwrap().record_id.clone();
    let b = b.applied().unwrap().record_id.clone();

    assert_ne!(a, b);
    for id in [&a, &b] {
        assert_eq!(id.as_str().len(), 14);
        assert!(id.as_str().bytes().all(|c| c.is_ascii_digit()));
        assert_eq!(id.stamp(), "2510301000");
    }
    assert_eq!(a.tail(), "0001");
    assert_eq!(b.tail(), "0002");
}

#[test]
fn latest_list_returns_four_newest() {
    let ledger = ledger();
    let mut pool = mem_pool();

    for (category, time) in [
        (Category::Start, "09:00"),
        (Category::StepAway, "10:00"),
        (Category::ReturnToSeat, "11:00"),
        (Category::StepAway, "12:00"),
        (Category::End, "13:00"),
    ] {
        report(&ledger, &mut pool, category, "2025-10-28", time, "20251028");
    }

    let list = ledger.latest_list(&pool, COMPANY, MEMBER).unwrap();
    let times: Vec<&str> = list.iter().map(|e| e.event_time.as_str()).collect();
    assert_eq!(times, ["1300", "1200", "1100", "1000"]);
}

#[test]
fn members_do_not_see_each_other() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");

    let other = ReportPayload::new("m002", Category::Start, "2025-10-28", "09:00").linked_to("20251028");
    assert!(ledger.report(&mut pool, COMPANY, &other).unwrap().is_accepted());

    let elsewhere = event(Category::Start, "2025-10-28", "09:00", "20251028");
    assert!(ledger.report(&mut pool, "globex", &elsewhere).unwrap().is_accepted());
}

// ---------------------------------------------------------------
// Format errors never reach the store
// ---------------------------------------------------------------

#[test]
fn malformed_input_is_a_format_error() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let bad_date = event(Category::Start, "2025/10/28", "09:00", "20251028");
    let err = ledger.report(&mut pool, COMPANY, &bad_date).unwrap_err();
    assert!(matches!(err, AppError::InvalidDate(_)));

    let bad_time = event(Category::Start, "2025-10-28", "9h", "20251028");
    let err = ledger.report(&mut pool, COMPANY, &bad_time).unwrap_err();
    assert!(matches!(err, AppError::InvalidTime(_)));

    let bad_linked = event(Category::Start, "2025-10-28", "09:00", "2025-10-28");
    assert!(ledger.report(&mut pool, COMPANY, &bad_linked).unwrap_err().is_format_error());

    let no_linked = ReportPayload::new(MEMBER, Category::Start, "2025-10-28", "09:00");
    assert!(ledger.report(&mut pool, COMPANY, &no_linked).unwrap_err().is_format_error());

    assert_eq!(count_rows(&pool, "work_events"), 0);
    assert_eq!(count_rows(&pool, "sequences"), 0);
}

#[test]
fn client_payloads_reject_malformed_record_ids() {
    let edit: EditPayload = serde_json::from_str(
        r#"{"record_id":"25102809000001","category":4,"date":"2025-10-28","time":"17:00"}"#,
    )
    .unwrap();
    assert_eq!(edit.record_id.as_str(), "25102809000001");
    assert_eq!(edit.category, Category::End);
    assert_eq!(edit.comment, None);

    let bad = serde_json::from_str::<EditPayload>(
        r#"{"record_id":"2510280900","category":4,"date":"2025-10-28","time":"17:00"}"#,
    );
    assert!(bad.is_err());

    let report: ReportPayload = serde_json::from_str(
        r#"{"member_id":"m001","category":1,"date":"2025-10-28","time":"09:00","linked_date":"20251028"}"#,
    )
    .unwrap();
    assert_eq!(report.linked_date.as_deref(), Some("20251028"));

    let id = RecordId::parse("25102809000001").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""25102809000001""#);
}

#[test]
fn holiday_category_is_refused_on_report_path() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let p = event(Category::Holiday(91), "2025-10-28", "09:00", "20251028");
    let err = ledger.report(&mut pool, COMPANY, &p).unwrap_err();
    assert!(matches!(err, AppError::InvalidCategory(_)));
}

// ---------------------------------------------------------------
// Editor insert, update, delete
// ---------------------------------------------------------------

#[test]
fn editor_insert_skips_validation_and_returns_latest() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");

    // Start after Start would be a mismatch on the validated path
    let p = ReportPayload::new(MEMBER, Category::Start, "2025-10-28", "08:00");
    let out = ledger.report_from_editor(&mut pool, COMPANY, &p).unwrap();

    let applied = out.applied().expect("accepted");
    // the 09:00 Start is still the newest event
    assert_eq!(applied.latest_category, Some(Category::Start));

    let inserted = load_event(&pool.conn, &applied.record_id)
        .unwrap()
        .unwrap();
    assert_eq!(inserted.linked_date, "20251028");
    assert!(!inserted.updated);
}

#[test]
fn update_overwrites_in_place_without_validation() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let away = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "12:00", "20251028");
    let id = away.applied().unwrap().record_id.clone();

    let edit = EditPayload {
        record_id: id.clone(),
        category: Category::End,
        date: "2025.10.28".into(),
        time: "17:30".into(),
        latitude: Some("35.68".into()),
        longitude: Some("139.76".into()),
        comment: Some("left early".into()),
    };
    let out = ledger.update(&mut pool, &edit).unwrap();
    let applied = out.applied().expect("updated");
    assert_eq!(applied.record_id, id);
    assert_eq!(applied.latest_category, Some(Category::End));

    let row = load_event(&pool.conn, &id).unwrap().unwrap();
    assert_eq!(row.category, Category::End);
    assert_eq!(row.event_time, "1730");
    assert_eq!(row.linked_date, "20251028");
    assert_eq!(row.comment.as_deref(), Some("left early"));
    assert!(row.updated);
    assert_eq!(count_rows(&pool, "work_events"), 2);
}

#[test]
fn update_and_delete_of_unknown_record_are_not_found() {
    let ledger = ledger();
    let mut pool = mem_pool();
    let ghost = RecordId::parse("25103010009999").unwrap();

    let edit = EditPayload {
        record_id: ghost.clone(),
        category: Category::End,
        date: "2025-10-28".into(),
        time: "17:30".into(),
        latitude: None,
        longitude: None,
        comment: None,
    };
    assert!(ledger.update(&mut pool, &edit).unwrap().is_not_found());
    assert!(ledger.delete(&mut pool, &ghost).unwrap().is_not_found());
    assert_eq!(count_rows(&pool, "log"), 2, "only the migration markers");
}

#[test]
fn delete_recomputes_from_remaining_events() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let away = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "12:00", "20251028");
    let id = away.applied().unwrap().record_id.clone();

    let out = ledger.delete(&mut pool, &id).unwrap();
    assert_eq!(out.applied().unwrap().latest_category, Some(Category::Start));

    // the member can step away again now
    let again = report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "12:30", "20251028");
    assert!(again.is_accepted());
}

#[test]
fn every_mutation_is_audited() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let out = report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    let id = out.applied().unwrap().record_id.clone();
    ledger.delete(&mut pool, &id).unwrap();

    let ops: Vec<String> = {
        let mut stmt = pool
            .conn
            .prepare("SELECT operation FROM log WHERE target = ?1 ORDER BY id")
            .unwrap();
        stmt.query_map([id.as_str()], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    };
    assert_eq!(ops, ["report", "delete"]);
}

// ---------------------------------------------------------------
// Legacy path
// ---------------------------------------------------------------

/// Report through the legacy path and return the stored linked date.
fn legacy(ledger: &Ledger<TableSequence, FixedClock>, pool: &mut DbPool, payload: ReportPayload) -> String {
    let out = ledger.report_legacy(pool, COMPANY, &payload).unwrap();
    let id = out.applied().expect("legacy path always accepts").record_id.clone();
    load_event(&pool.conn, &id)
        .unwrap()
        .unwrap()
        .linked_date
}

#[test]
fn legacy_end_after_midnight_inherits_prior_linked_day() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "22:00", "20251028");
    let linked = legacy(
        &ledger,
        &mut pool,
        ReportPayload::new(MEMBER, Category::End, "2025-10-29", "02:00"),
    );
    assert_eq!(linked, "20251028");
}

#[test]
fn legacy_start_is_linked_to_its_own_date() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "22:00", "20251028");
    report(&ledger, &mut pool, Category::End, "2025-10-29", "02:00", "20251028");

    let linked = legacy(
        &ledger,
        &mut pool,
        ReportPayload::new(MEMBER, Category::Start, "2025-10-29", "09:00"),
    );
    assert_eq!(linked, "20251029");
}

#[test]
fn legacy_without_history_uses_event_date() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let linked = legacy(
        &ledger,
        &mut pool,
        ReportPayload::new(MEMBER, Category::StepAway, "2025.10.28", "12:00"),
    );
    assert_eq!(linked, "20251028");
}

#[test]
fn legacy_keeps_a_supplied_linked_date() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "22:00", "20251028");
    let linked = legacy(
        &ledger,
        &mut pool,
        ReportPayload::new(MEMBER, Category::End, "2025-10-29", "02:00").linked_to("20251029"),
    );
    assert_eq!(linked, "20251029");
}

#[test]
fn legacy_performs_no_transition_check() {
    let ledger = ledger();
    let mut pool = mem_pool();

    report(&ledger, &mut pool, Category::Start, "2025-10-28", "09:00", "20251028");
    report(&ledger, &mut pool, Category::StepAway, "2025-10-28", "10:00", "20251028");

    // StepAway after StepAway, earlier in the day
    let out = ledger
        .report_legacy(
            &mut pool,
            COMPANY,
            &ReportPayload::new(MEMBER, Category::StepAway, "2025-10-28", "08:00"),
        )
        .unwrap();
    assert!(out.is_accepted());
    assert_eq!(count_rows(&pool, "work_events"), 3);
}

#[test]
fn optional_fields_are_stored_as_given() {
    let ledger = ledger();
    let mut pool = mem_pool();

    let p = event(Category::Start, "2025-10-28", "09:00", "20251028")
        .at("35.6812", "-139.7671")
        .with_comment("home office");
    let out = ledger.report(&mut pool, COMPANY, &p).unwrap();
    let id = out.applied().unwrap().record_id.clone();

    let row = load_event(&pool.conn, &id).unwrap().unwrap();
    assert_eq!(row.latitude.as_deref(), Some("35.6812"));
    assert_eq!(row.longitude.as_deref(), Some("-139.7671"));
    assert_eq!(row.comment.as_deref(), Some("home office"));
    assert_eq!(row.inserted_at, row.recorded_at);
}
