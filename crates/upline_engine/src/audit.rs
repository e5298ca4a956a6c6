//! Audit trail for admin-gated actions.
//!
//! Every ledger or payout transition appends one record here: action name,
//! actor, affected ids, structured before/after context, and an optional
//! note. Append-only.

use diesel::prelude::*;
use tracing::instrument;
use upline_database::schema::affiliate_audit_log::dsl as audit_log;
use upline_database::{AuditRecordRow, NewAuditRecord};
use upline_error::{DatabaseError, DatabaseResult};

/// Append one audit record.
///
/// # Errors
///
/// Returns an error on insert failure.
#[instrument(skip(conn, record), fields(action = %record.action, actor_id = %record.actor_id))]
pub fn record_audit(conn: &mut PgConnection, record: &NewAuditRecord) -> DatabaseResult<()> {
    diesel::insert_into(audit_log::affiliate_audit_log)
        .values(record)
        .execute(conn)
        .map_err(DatabaseError::from)?;
    Ok(())
}

/// Most recent audit records, newest first.
///
/// # Errors
///
/// Returns an error on query failure.
#[instrument(skip(conn))]
pub fn recent_audit_records(
    conn: &mut PgConnection,
    limit: i64,
) -> DatabaseResult<Vec<AuditRecordRow>> {
    audit_log::affiliate_audit_log
        .order(audit_log::created_at.desc())
        .limit(limit)
        .load(conn)
        .map_err(DatabaseError::from)
}
