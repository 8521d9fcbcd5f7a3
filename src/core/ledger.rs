//! Record Lifecycle Operations.
//!
//! Every mutation runs inside a `BEGIN IMMEDIATE` transaction: reading the
//! latest event, validating, allocating the id and inserting happen while
//! this connection holds the database write lock, so two writers can never
//! validate against the same stale latest event. Lock waits are bounded by
//! the connection busy timeout.

use crate::core::clock::{Clock, SystemClock};
use crate::core::overlay::{can_insert_holiday, can_insert_ordinary};
use crate::core::reconciler::{MonthWindow, derive_linked_date, open_shift_overdue};
use crate::core::validator::{Candidate, check_transition};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::db::sequence::{SequenceAllocator, TableSequence};
use crate::errors::{AppError, AppResult, StoreContext};
use crate::models::category::Category;
use crate::models::month_view::MonthView;
use crate::models::outcome::{Applied, MismatchKind, Outcome};
use crate::models::payload::{EditPayload, HolidayPayload, HolidayUpdate, ReportPayload};
use crate::models::record_id::RecordId;
use crate::models::work_event::{SENTINEL_DATE, SENTINEL_TIME, WorkEvent};
use crate::utils::date::{linked_date, normalize_date, normalize_time, server_timestamp};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{info, warn};

/// How many events `latest_list` returns.
pub const LATEST_LIST_LEN: usize = 4;

/// Date and time of an inbound event, already normalized.
struct Normalized {
    event_date: String,
    event_time: String,
}

fn normalize(date: &str, time: &str) -> AppResult<Normalized> {
    Ok(Normalized {
        event_date: normalize_date(date)?,
        event_time: normalize_time(time)?,
    })
}

fn ordinary_only(category: Category) -> AppResult<()> {
    if category.is_holiday() {
        return Err(AppError::InvalidCategory(format!(
            "{category}: holiday categories are registered with the holiday operations"
        )));
    }
    Ok(())
}

fn holiday_only(category: Category) -> AppResult<()> {
    if !category.is_holiday() {
        return Err(AppError::InvalidCategory(format!(
            "{category}: not a holiday category"
        )));
    }
    Ok(())
}

fn begin(pool: &mut DbPool) -> AppResult<Transaction<'_>> {
    pool.conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .op("begin_write")
}

fn latest_category(conn: &Connection, company_id: &str, member_id: &str) -> AppResult<Option<Category>> {
    Ok(queries::latest_event(conn, company_id, member_id)?.map(|ev| ev.category))
}

/// Stateless ledger service. Holds only its injected allocator and clock; the
/// store is passed to each call.
#[derive(Debug, Clone, Default)]
pub struct Ledger<A: SequenceAllocator = TableSequence, C: Clock = SystemClock> {
    allocator: A,
    clock: C,
}

impl Ledger<TableSequence, SystemClock> {
    pub fn system() -> Self {
        Self::new(TableSequence::default(), SystemClock)
    }
}

impl<A: SequenceAllocator, C: Clock> Ledger<A, C> {
    pub fn new(allocator: A, clock: C) -> Self {
        Self { allocator, clock }
    }

    fn allocate(&self, conn: &Connection) -> AppResult<RecordId> {
        let seq = self.allocator.next_sequence(conn)?;
        Ok(RecordId::compose(self.clock.now(), seq))
    }

    fn stamp(&self) -> String {
        server_timestamp(self.clock.now())
    }

    /// Allocate an id, insert, audit, recompute. Caller commits.
    #[allow(clippy::too_many_arguments)]
    fn append(
        &self,
        tx: &Transaction,
        operation: &str,
        company_id: &str,
        member_id: &str,
        category: Category,
        event_date: String,
        event_time: String,
        linked_date: String,
        latitude: Option<String>,
        longitude: Option<String>,
        comment: Option<String>,
        updated: bool,
    ) -> AppResult<Applied> {
        let record_id = self.allocate(tx)?;
        let now = self.stamp();

        let ev = WorkEvent {
            record_id: record_id.clone(),
            company_id: company_id.to_string(),
            member_id: member_id.to_string(),
            category,
            event_date,
            event_time,
            linked_date,
            latitude,
            longitude,
            comment,
            updated,
            inserted_at: now.clone(),
            recorded_at: now,
        };

        let affected = queries::insert_event(tx, &ev)?;
        ttlog(
            tx,
            operation,
            record_id.as_str(),
            &format!(
                "{company_id}/{member_id} {category} at {} linked to {}",
                ev.display_moment(),
                ev.linked_date
            ),
        )?;

        let latest = latest_category(tx, company_id, member_id)?;
        info!(operation, %record_id, %category, "event appended");

        Ok(Applied {
            record_id,
            affected,
            latest_category: latest,
        })
    }

    // ------------------------------------------------------------------
    // Insert variants
    // ------------------------------------------------------------------

    /// Current insert path: overlay check, transition validation, append.
    ///
    /// The payload must carry its `linked_date`.
    pub fn report(
        &self,
        pool: &mut DbPool,
        company_id: &str,
        payload: &ReportPayload,
    ) -> AppResult<Outcome> {
        ordinary_only(payload.category)?;
        let n = normalize(&payload.date, &payload.time)?;
        let linked = match &payload.linked_date {
            Some(raw) => linked_date(raw)?,
            None => return Err(AppError::InvalidDate("missing linked_date".into())),
        };

        let tx = begin(pool)?;

        if !can_insert_ordinary(&tx, company_id, &payload.member_id, &linked)? {
            warn!(company_id, member_id = %payload.member_id, linked_date = %linked, "holiday already registered");
            return Ok(Outcome::mismatch(MismatchKind::HolidayConflict));
        }

        let latest = queries::latest_event(&tx, company_id, &payload.member_id)?;
        let cand = Candidate {
            category: payload.category,
            event_date: &n.event_date,
            event_time: &n.event_time,
            linked_date: &linked,
        };

        if let Err(kind) = check_transition(latest.as_ref(), &cand) {
            warn!(
                company_id,
                member_id = %payload.member_id,
                category = %payload.category,
                ?kind,
                "transition rejected"
            );
            return Ok(Outcome::mismatch(kind));
        }

        let applied = self.append(
            &tx,
            "report",
            company_id,
            &payload.member_id,
            payload.category,
            n.event_date,
            n.event_time,
            linked,
            payload.latitude.clone(),
            payload.longitude.clone(),
            payload.comment.clone(),
            payload.updated.unwrap_or(false),
        )?;

        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    /// Compatibility path for clients that predate linked dates. Derives the
    /// linked date when absent and performs no transition validation.
    pub fn report_legacy(
        &self,
        pool: &mut DbPool,
        company_id: &str,
        payload: &ReportPayload,
    ) -> AppResult<Outcome> {
        let n = normalize(&payload.date, &payload.time)?;
        let given = payload.linked_date.as_deref().map(linked_date).transpose()?;

        let tx = begin(pool)?;

        let linked = match given {
            Some(l) => l,
            None => {
                let prior = queries::latest_event(&tx, company_id, &payload.member_id)?;
                derive_linked_date(payload.category, &n.event_date, prior.as_ref())
            }
        };

        let applied = self.append(
            &tx,
            "report_legacy",
            company_id,
            &payload.member_id,
            payload.category,
            n.event_date,
            n.event_time,
            linked,
            payload.latitude.clone(),
            payload.longitude.clone(),
            payload.comment.clone(),
            payload.updated.unwrap_or(false),
        )?;

        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    /// Insert from the correction screen: no validation. The linked date
    /// defaults to the event's own date.
    pub fn report_from_editor(
        &self,
        pool: &mut DbPool,
        company_id: &str,
        payload: &ReportPayload,
    ) -> AppResult<Outcome> {
        ordinary_only(payload.category)?;
        let n = normalize(&payload.date, &payload.time)?;
        let linked = match &payload.linked_date {
            Some(raw) => linked_date(raw)?,
            None => n.event_date.clone(),
        };

        let tx = begin(pool)?;
        let applied = self.append(
            &tx,
            "report_from_editor",
            company_id,
            &payload.member_id,
            payload.category,
            n.event_date,
            n.event_time,
            linked,
            payload.latitude.clone(),
            payload.longitude.clone(),
            payload.comment.clone(),
            payload.updated.unwrap_or(false),
        )?;

        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    // ------------------------------------------------------------------
    // Update / delete
    // ------------------------------------------------------------------

    /// Operator correction, applied as given (no transition validation).
    pub fn update(&self, pool: &mut DbPool, payload: &EditPayload) -> AppResult<Outcome> {
        ordinary_only(payload.category)?;
        let n = normalize(&payload.date, &payload.time)?;

        let tx = begin(pool)?;
        let Some(mut ev) = queries::load_event(&tx, &payload.record_id)? else {
            return Ok(Outcome::NotFound {
                record_id: payload.record_id.clone(),
            });
        };

        ev.category = payload.category;
        ev.event_date = n.event_date;
        ev.event_time = n.event_time;
        ev.latitude = payload.latitude.clone();
        ev.longitude = payload.longitude.clone();
        ev.comment = payload.comment.clone();
        ev.updated = true;
        ev.recorded_at = self.stamp();

        let applied = self.rewrite(&tx, "update", &ev)?;
        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    fn rewrite(&self, tx: &Transaction, operation: &str, ev: &WorkEvent) -> AppResult<Applied> {
        let affected = queries::update_event(tx, ev)?;
        ttlog(
            tx,
            operation,
            ev.record_id.as_str(),
            &format!(
                "{}/{} {} at {}",
                ev.company_id,
                ev.member_id,
                ev.category,
                ev.display_moment()
            ),
        )?;

        let latest = latest_category(tx, &ev.company_id, &ev.member_id)?;
        info!(operation, record_id = %ev.record_id, "event rewritten");

        Ok(Applied {
            record_id: ev.record_id.clone(),
            affected,
            latest_category: latest,
        })
    }

    /// Delete by id. The owner is resolved from the row itself; the latest
    /// category is recomputed only if a row was actually removed.
    pub fn delete(&self, pool: &mut DbPool, record_id: &RecordId) -> AppResult<Outcome> {
        self.remove(pool, "delete", record_id, false)
    }

    /// With `holidays_only`, a row that is not a holiday counts as not found.
    fn remove(
        &self,
        pool: &mut DbPool,
        operation: &str,
        record_id: &RecordId,
        holidays_only: bool,
    ) -> AppResult<Outcome> {
        let tx = begin(pool)?;

        let Some(ev) = queries::load_event(&tx, record_id)? else {
            return Ok(Outcome::NotFound {
                record_id: record_id.clone(),
            });
        };
        if holidays_only && !ev.category.is_holiday() {
            warn!(operation, %record_id, category = %ev.category, "not a holiday row");
            return Ok(Outcome::NotFound {
                record_id: record_id.clone(),
            });
        }
        let WorkEvent {
            company_id,
            member_id,
            ..
        } = ev;

        let affected = queries::delete_event(&tx, record_id)?;
        if affected == 0 {
            return Ok(Outcome::NotFound {
                record_id: record_id.clone(),
            });
        }

        ttlog(
            &tx,
            operation,
            record_id.as_str(),
            &format!("{company_id}/{member_id} record deleted"),
        )?;
        let latest = latest_category(&tx, &company_id, &member_id)?;
        tx.commit().op("commit")?;

        info!(operation, %record_id, "event deleted");
        Ok(Outcome::Accepted(Applied {
            record_id: record_id.clone(),
            affected,
            latest_category: latest,
        }))
    }

    // ------------------------------------------------------------------
    // Holidays
    // ------------------------------------------------------------------

    /// Register a holiday/leave day. Refused if the linked day already holds
    /// anything.
    pub fn register_holiday(
        &self,
        pool: &mut DbPool,
        company_id: &str,
        payload: &HolidayPayload,
    ) -> AppResult<Outcome> {
        holiday_only(payload.category)?;
        let linked = linked_date(&payload.linked_date)?;

        let tx = begin(pool)?;
        if !can_insert_holiday(&tx, company_id, &payload.member_id, &linked)? {
            warn!(company_id, member_id = %payload.member_id, linked_date = %linked, "linked day not free");
            return Ok(Outcome::mismatch(MismatchKind::HolidayConflict));
        }

        let applied = self.append(
            &tx,
            "holiday",
            company_id,
            &payload.member_id,
            payload.category,
            SENTINEL_DATE.to_string(),
            SENTINEL_TIME.to_string(),
            linked,
            None,
            None,
            payload.comment.clone(),
            false,
        )?;

        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    /// Change the type or comment of a holiday row. No overlay check; rows of
    /// any other category are reported as not found.
    pub fn update_holiday(&self, pool: &mut DbPool, payload: &HolidayUpdate) -> AppResult<Outcome> {
        holiday_only(payload.category)?;

        let tx = begin(pool)?;
        let Some(mut ev) = queries::load_event(&tx, &payload.record_id)?
            .filter(|ev| ev.category.is_holiday())
        else {
            return Ok(Outcome::NotFound {
                record_id: payload.record_id.clone(),
            });
        };

        ev.category = payload.category;
        ev.event_date = SENTINEL_DATE.to_string();
        ev.event_time = SENTINEL_TIME.to_string();
        ev.latitude = None;
        ev.longitude = None;
        ev.comment = payload.comment.clone();
        ev.updated = true;
        ev.recorded_at = self.stamp();

        let applied = self.rewrite(&tx, "holiday_update", &ev)?;
        tx.commit().op("commit")?;
        Ok(Outcome::Accepted(applied))
    }

    pub fn delete_holiday(&self, pool: &mut DbPool, record_id: &RecordId) -> AppResult<Outcome> {
        self.remove(pool, "holiday_del", record_id, true)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn latest(
        &self,
        pool: &DbPool,
        company_id: &str,
        member_id: &str,
    ) -> AppResult<Option<WorkEvent>> {
        queries::latest_event(&pool.conn, company_id, member_id)
    }

    /// Up to four most recent events, newest first.
    pub fn latest_list(
        &self,
        pool: &DbPool,
        company_id: &str,
        member_id: &str,
    ) -> AppResult<Vec<WorkEvent>> {
        queries::select_latest(&pool.conn, company_id, member_id, LATEST_LIST_LEN)
    }

    /// Events linked inside `month` (`YYYYMM` / `YYYY-MM`, current month when
    /// `None`) with the nearest events on either side.
    pub fn month_view(
        &self,
        pool: &DbPool,
        company_id: &str,
        member_id: &str,
        month: Option<&str>,
    ) -> AppResult<MonthView> {
        let window = MonthWindow::new(month, self.clock.now().date())?;
        let conn = &pool.conn;

        Ok(MonthView {
            events: queries::select_by_linked_month(conn, company_id, member_id, &window.prefix)?,
            prev: queries::select_prev(conn, company_id, member_id, &window.prev_boundary)?,
            next: queries::select_next(conn, company_id, member_id, &window.next_boundary)?,
            month: window.prefix,
        })
    }

    /// Whether the member's open shift has gone on for more than a day.
    pub fn overdue(
        &self,
        pool: &DbPool,
        company_id: &str,
        member_id: &str,
        clock_offset_hours: i64,
    ) -> AppResult<bool> {
        let latest = self.latest(pool, company_id, member_id)?;
        Ok(open_shift_overdue(
            latest.as_ref(),
            self.clock.now(),
            clock_offset_hours,
        ))
    }
}
