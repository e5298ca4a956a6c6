//! Payout balance reconciliation and request lifecycle.
//!
//! Available balance is the conservation check of the whole engine: approved
//! earnings are the ceiling, and every payout request that is not REJECTED
//! reserves against that ceiling the moment it is created. An affiliate can
//! never hold overlapping requests that jointly exceed approved earnings.

use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use diesel::prelude::*;
use serde_json::json;
use tracing::{debug, error, info, instrument};
use upline_core::{LedgerStatus, MIN_PAYOUT_CENTS, PayoutAction, PayoutStatus};
use upline_database::schema::commission_ledger::dsl as ledger;
use upline_database::schema::payout_requests::dsl as payouts;
use upline_database::{NewAuditRecord, NewPayoutRequest, PayoutRequestRow};
use upline_error::{
    DatabaseError, DatabaseErrorKind, PayoutError, PayoutErrorKind, PayoutResult,
};
use uuid::Uuid;

use crate::audit::record_audit;
use crate::referral::load_profile;

/// Destination account details supplied with a payout request.
#[derive(Debug, Clone, PartialEq, Eq, new, Getters, Setters, serde::Serialize)]
#[setters(prefix = "with_")]
pub struct BankInfo {
    /// Receiving bank
    bank_name: String,
    /// Account holder name
    account_name: String,
    /// Account number
    account_number: String,
    /// Free-text note from the affiliate
    #[new(default)]
    note: Option<String>,
}

/// Amount `affiliate_id` may withdraw right now, in minor units.
///
/// `sum(APPROVED ledger earnings) - sum(non-REJECTED payout requests)`,
/// floored at zero. REQUESTED (not yet reviewed) requests already reserve:
/// a submitted request blocks overlapping withdrawals immediately.
///
/// # Errors
///
/// Returns an error on query failure.
#[instrument(skip(conn), fields(affiliate_id = %affiliate_id))]
pub fn available_payout_cents(
    conn: &mut PgConnection,
    affiliate_id: Uuid,
) -> PayoutResult<i64> {
    let approved: i64 = ledger::commission_ledger
        .filter(ledger::earner_id.eq(affiliate_id))
        .filter(ledger::status.eq(LedgerStatus::Approved.to_string()))
        .select(ledger::amount_cents)
        .load::<i64>(conn)
        .map_err(DatabaseError::from)?
        .into_iter()
        .sum();

    let reserved: i64 = payouts::payout_requests
        .filter(payouts::user_id.eq(affiliate_id))
        .filter(payouts::status.eq_any([
            PayoutStatus::Requested.to_string(),
            PayoutStatus::Approved.to_string(),
            PayoutStatus::Paid.to_string(),
        ]))
        .select(payouts::amount_cents)
        .load::<i64>(conn)
        .map_err(DatabaseError::from)?
        .into_iter()
        .sum();

    let available = (approved - reserved).max(0);
    debug!(approved, reserved, available, "Computed available payout");
    Ok(available)
}

/// Validate a requested amount against the minimum and the available balance.
///
/// Pure check shared by the creation path and its tests.
pub fn validate_payout_amount(amount_cents: i64, available_cents: i64) -> PayoutResult<()> {
    if amount_cents < MIN_PAYOUT_CENTS {
        return Err(PayoutError::new(PayoutErrorKind::BelowMinimum {
            amount_cents,
            minimum_cents: MIN_PAYOUT_CENTS,
        }));
    }
    if amount_cents > available_cents {
        return Err(PayoutError::new(PayoutErrorKind::InsufficientBalance {
            amount_cents,
            available_cents,
        }));
    }
    Ok(())
}

/// Create a payout request for `user_id`.
///
/// The affiliate must be enabled, the amount must meet [`MIN_PAYOUT_CENTS`],
/// and the amount must fit inside the available balance recomputed at
/// request time (never cached). Each rejection carries the specific
/// constraint that failed.
///
/// # Errors
///
/// Returns an error if the profile is missing or not enabled, the amount
/// fails validation, or a query fails.
#[instrument(skip(conn, bank_info), fields(user_id = %user_id, amount_cents))]
pub fn create_payout_request(
    conn: &mut PgConnection,
    user_id: Uuid,
    amount_cents: i64,
    bank_info: &BankInfo,
) -> PayoutResult<PayoutRequestRow> {
    let profile = load_profile(conn, user_id)?
        .ok_or_else(|| PayoutError::new(PayoutErrorKind::MemberNotFound(user_id.to_string())))?;
    if !profile.is_affiliate_enabled {
        return Err(PayoutError::new(PayoutErrorKind::NotEnabled));
    }

    let available = available_payout_cents(conn, user_id)?;
    validate_payout_amount(amount_cents, available)?;

    let new_request = NewPayoutRequest {
        id: Uuid::new_v4(),
        user_id,
        amount_cents,
        status: PayoutStatus::Requested.to_string(),
        bank_name: bank_info.bank_name.clone(),
        account_name: bank_info.account_name.clone(),
        account_number: bank_info.account_number.clone(),
        note: bank_info.note.clone(),
    };
    let row: PayoutRequestRow = diesel::insert_into(payouts::payout_requests)
        .values(&new_request)
        .returning(PayoutRequestRow::as_returning())
        .get_result(conn)
        .map_err(DatabaseError::from)?;

    info!(payout_id = %row.id, "Created payout request");
    Ok(row)
}

/// Apply an admin `action` to one payout request.
///
/// Guarded by the current status both at validation time and inside the
/// update statement; a concurrent transition surfaces as a retryable
/// conflict. Appends an audit record with the affiliate and amount.
///
/// # Errors
///
/// Returns an error if the request is missing, the transition is illegal
/// from the current status, a concurrent update raced this one, or a query
/// fails.
#[instrument(skip(conn), fields(payout_id = %payout_id, action = %action, actor_id = %actor_id))]
pub fn apply_payout_action(
    conn: &mut PgConnection,
    payout_id: Uuid,
    action: PayoutAction,
    actor_id: &str,
) -> PayoutResult<PayoutRequestRow> {
    let row: PayoutRequestRow = payouts::payout_requests
        .find(payout_id)
        .first(conn)
        .optional()
        .map_err(DatabaseError::from)?
        .ok_or_else(|| PayoutError::new(PayoutErrorKind::NotFound(payout_id.to_string())))?;

    let current = parse_status(&row.status)?;
    let Some(target) = action.apply(current) else {
        return Err(PayoutError::new(PayoutErrorKind::InvalidTransition(
            action.rejection_message().to_string(),
        )));
    };

    let now = chrono::Utc::now().naive_utc();
    let guarded = payouts::payout_requests
        .find(payout_id)
        .filter(payouts::status.eq(current.to_string()));

    let updated = match action {
        PayoutAction::Approve => diesel::update(guarded)
            .set((
                payouts::status.eq(target.to_string()),
                payouts::approved_at.eq(now),
            ))
            .execute(conn),
        PayoutAction::MarkPaid => diesel::update(guarded)
            .set((
                payouts::status.eq(target.to_string()),
                payouts::paid_at.eq(now),
            ))
            .execute(conn),
        PayoutAction::Reject => diesel::update(guarded)
            .set(payouts::status.eq(target.to_string()))
            .execute(conn),
    }
    .map_err(DatabaseError::from)?;

    if updated == 0 {
        return Err(DatabaseError::new(DatabaseErrorKind::Conflict(format!(
            "payout {} changed status concurrently",
            payout_id
        )))
        .into());
    }

    let audit = NewAuditRecord::for_targets(action.audit_name(), actor_id, &[payout_id])
        .with_context(json!({
            "affiliate_id": row.user_id.to_string(),
            "amount_cents": row.amount_cents,
            "from": current.to_string(),
            "to": target.to_string(),
        }));
    // Transition is durable; audit failures are logged, not propagated.
    if let Err(e) = record_audit(conn, &audit) {
        error!(error = %e, "Failed to append audit record for payout transition");
    }

    let refreshed: PayoutRequestRow = payouts::payout_requests
        .find(payout_id)
        .first(conn)
        .map_err(DatabaseError::from)?;
    debug!(from = %current, to = %target, "Applied payout transition");
    Ok(refreshed)
}

/// Payout requests submitted by one affiliate, newest first.
#[instrument(skip(conn), fields(user_id = %user_id))]
pub fn payout_requests_for_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> PayoutResult<Vec<PayoutRequestRow>> {
    payouts::payout_requests
        .filter(payouts::user_id.eq(user_id))
        .order(payouts::created_at.desc())
        .load(conn)
        .map_err(|e| PayoutError::from(DatabaseError::from(e)))
}

fn parse_status(raw: &str) -> PayoutResult<PayoutStatus> {
    raw.parse().map_err(|_| {
        PayoutError::from(DatabaseError::new(DatabaseErrorKind::Serialization(
            format!("unknown payout status '{}'", raw),
        )))
    })
}
