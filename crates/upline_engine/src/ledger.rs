//! Commission ledger state machine and read queries.
//!
//! Entries move PENDING -> APPROVED -> PAID, or to REVERSED from any
//! non-REVERSED status. Transitions are admin-gated, batch-capable, and
//! all-or-nothing: a selection that mixes statuses is rejected before any
//! write is issued.

use std::collections::BTreeSet;

use derive_getters::Getters;
use diesel::prelude::*;
use serde_json::json;
use tracing::{debug, error, instrument};
use upline_core::{LedgerAction, LedgerStatus};
use upline_database::schema::commission_ledger::dsl as ledger;
use upline_database::{CommissionLedgerRow, NewAuditRecord};
use upline_error::{
    DatabaseError, DatabaseErrorKind, LedgerError, LedgerErrorKind, LedgerResult,
};
use uuid::Uuid;

use crate::audit::record_audit;

/// Summary of a successfully applied batch transition.
#[derive(Debug, Clone, Getters)]
pub struct LedgerTransition {
    /// Action that was applied
    action: LedgerAction,
    /// Status every selected entry held before the transition
    from_status: LedgerStatus,
    /// Status every selected entry holds now
    to_status: LedgerStatus,
    /// The transitioned entry ids
    entry_ids: Vec<Uuid>,
}

/// Apply `action` to every entry in `entry_ids`, atomically.
///
/// All selected entries must currently share the same status, and the action
/// must be legal from that status. The write is a single bulk update guarded
/// by the checked status; if a concurrent transition raced this one, the
/// short row count is reported as a retryable conflict rather than a partial
/// success. Each applied transition appends an audit record.
///
/// # Errors
///
/// Returns an error on an empty selection, missing ids, mixed statuses, an
/// illegal transition, a lost update race, or query failure.
#[instrument(skip(conn), fields(action = %action, actor_id = %actor_id, count = entry_ids.len()))]
pub fn apply_ledger_action(
    conn: &mut PgConnection,
    entry_ids: &[Uuid],
    action: LedgerAction,
    actor_id: &str,
    note: Option<&str>,
) -> LedgerResult<LedgerTransition> {
    if entry_ids.is_empty() {
        return Err(LedgerError::new(LedgerErrorKind::EmptySelection));
    }

    let rows: Vec<(Uuid, String)> = ledger::commission_ledger
        .filter(ledger::id.eq_any(entry_ids))
        .select((ledger::id, ledger::status))
        .load(conn)
        .map_err(DatabaseError::from)?;

    if rows.len() != entry_ids.len() {
        let found: BTreeSet<Uuid> = rows.iter().map(|(id, _)| *id).collect();
        let missing: Vec<String> = entry_ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(Uuid::to_string)
            .collect();
        return Err(LedgerError::new(LedgerErrorKind::EntriesNotFound(missing)));
    }

    let current = uniform_status(&rows)?;
    let Some(target) = action.apply(current) else {
        return Err(LedgerError::new(LedgerErrorKind::InvalidTransition(
            format!(
                "Entries with status {} cannot be {}",
                current,
                action.verb()
            ),
        )));
    };

    let now = chrono::Utc::now().naive_utc();
    let guarded = ledger::commission_ledger
        .filter(ledger::id.eq_any(entry_ids))
        .filter(ledger::status.eq(current.to_string()));

    let updated = match action {
        LedgerAction::Approve => diesel::update(guarded)
            .set((
                ledger::status.eq(target.to_string()),
                ledger::approved_at.eq(now),
            ))
            .execute(conn),
        LedgerAction::MarkPaid => diesel::update(guarded)
            .set((
                ledger::status.eq(target.to_string()),
                ledger::paid_at.eq(now),
            ))
            .execute(conn),
        LedgerAction::Reverse => diesel::update(guarded)
            .set((
                ledger::status.eq(target.to_string()),
                ledger::note.eq(note.map(str::to_string)),
            ))
            .execute(conn),
    }
    .map_err(DatabaseError::from)?;

    if updated != entry_ids.len() {
        return Err(DatabaseError::new(DatabaseErrorKind::Conflict(format!(
            "expected to transition {} entries, {} matched; a concurrent \
             transition changed the selection",
            entry_ids.len(),
            updated
        )))
        .into());
    }

    let audit = NewAuditRecord::for_targets(action.audit_name(), actor_id, entry_ids)
        .with_context(json!({
            "from": current.to_string(),
            "to": target.to_string(),
        }))
        .with_note(note.map(str::to_string));
    // The transition is already durable; a failed audit append is logged,
    // not propagated.
    if let Err(e) = record_audit(conn, &audit) {
        error!(error = %e, "Failed to append audit record for ledger transition");
    }

    debug!(from = %current, to = %target, "Applied ledger transition");
    Ok(LedgerTransition {
        action,
        from_status: current,
        to_status: target,
        entry_ids: entry_ids.to_vec(),
    })
}

/// Verify every selected row holds one status and parse it.
fn uniform_status(rows: &[(Uuid, String)]) -> LedgerResult<LedgerStatus> {
    let Some((_, first)) = rows.first() else {
        return Err(LedgerError::new(LedgerErrorKind::EmptySelection));
    };
    if rows.iter().any(|(_, s)| s != first) {
        return Err(LedgerError::new(LedgerErrorKind::MixedBatch));
    }
    parse_status(first).map_err(LedgerError::from)
}

pub(crate) fn parse_status(raw: &str) -> Result<LedgerStatus, DatabaseError> {
    raw.parse().map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "unknown ledger status '{}'",
            raw
        )))
    })
}

/// Ledger entries earned by one affiliate, newest first, optionally filtered
/// by status.
#[instrument(skip(conn), fields(earner_id = %earner_id))]
pub fn ledger_entries_for_earner(
    conn: &mut PgConnection,
    earner_id: Uuid,
    status: Option<LedgerStatus>,
    limit: i64,
    offset: i64,
) -> LedgerResult<Vec<CommissionLedgerRow>> {
    let mut query = ledger::commission_ledger
        .filter(ledger::earner_id.eq(earner_id))
        .order(ledger::created_at.desc())
        .limit(limit)
        .offset(offset)
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(ledger::status.eq(status.to_string()));
    }
    query
        .load(conn)
        .map_err(|e| LedgerError::from(DatabaseError::from(e)))
}

/// The admin review queue: PENDING entries, oldest first.
#[instrument(skip(conn))]
pub fn pending_ledger_entries(
    conn: &mut PgConnection,
    limit: i64,
    offset: i64,
) -> LedgerResult<Vec<CommissionLedgerRow>> {
    ledger::commission_ledger
        .filter(ledger::status.eq(LedgerStatus::Pending.to_string()))
        .order(ledger::created_at.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)
        .map_err(|e| LedgerError::from(DatabaseError::from(e)))
}

/// Lifetime earnings of one affiliate, split by ledger status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, serde::Serialize)]
pub struct EarningsSummary {
    /// Awaiting review
    pending_cents: i64,
    /// Approved, counts toward available balance
    approved_cents: i64,
    /// Already paid out
    paid_cents: i64,
    /// Voided
    reversed_cents: i64,
}

/// Total earnings for `earner_id` in one pass over their ledger rows.
///
/// # Errors
///
/// Returns an error on query failure or a corrupt status value.
#[instrument(skip(conn), fields(earner_id = %earner_id))]
pub fn earnings_summary(
    conn: &mut PgConnection,
    earner_id: Uuid,
) -> LedgerResult<EarningsSummary> {
    fold_earnings(conn, earner_id).map_err(LedgerError::from)
}

pub(crate) fn fold_earnings(
    conn: &mut PgConnection,
    earner_id: Uuid,
) -> Result<EarningsSummary, DatabaseError> {
    let rows: Vec<(String, i64)> = ledger::commission_ledger
        .filter(ledger::earner_id.eq(earner_id))
        .select((ledger::status, ledger::amount_cents))
        .load(conn)?;

    let mut summary = EarningsSummary::default();
    for (status, amount) in rows {
        match parse_status(&status)? {
            LedgerStatus::Pending => summary.pending_cents += amount,
            LedgerStatus::Approved => summary.approved_cents += amount,
            LedgerStatus::Paid => summary.paid_cents += amount,
            LedgerStatus::Reversed => summary.reversed_cents += amount,
        }
    }
    Ok(summary)
}
