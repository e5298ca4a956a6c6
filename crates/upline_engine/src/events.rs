//! Commission event recording.
//!
//! The idempotency-critical path: a monetizable action arrives with a
//! caller-supplied `external_ref`, and repeated deliveries of the same ref
//! (webhook retries, double submits) must produce exactly one event and one
//! set of ledger rows.

use std::collections::HashMap;

use derive_builder::Builder;
use derive_getters::Getters;
use diesel::prelude::*;
use tracing::{debug, info, instrument};
use upline_core::{
    AffiliateEventType, LedgerStatus, MAX_COMMISSION_LEVELS, commission_amount_cents, rate_bps,
};
use upline_database::schema::{affiliate_events, affiliate_profiles, commission_ledger};
use upline_database::{NewAffiliateEvent, NewCommissionLedgerEntry};
use upline_error::{DatabaseError, EventError, EventErrorKind, EventResult};
use uuid::Uuid;

use crate::referral::{decode_path, load_profile};

/// A monetizable action to record.
#[derive(Debug, Clone, Getters, Builder)]
#[builder(setter(into))]
pub struct EventRequest {
    /// Member whose purchase triggered the event
    buyer_id: Uuid,
    /// Shop the purchase happened in, when applicable
    #[builder(default)]
    shop_id: Option<Uuid>,
    /// Kind of action
    event_type: AffiliateEventType,
    /// Base amount commissions are computed from, in minor units
    amount_cents: i64,
    /// Denormalized package/top-up classifier
    #[builder(default)]
    classifier_code: Option<String>,
    /// Caller-supplied idempotency key, stable across retries of the same
    /// logical purchase
    external_ref: String,
}

/// Result of recording an event.
#[derive(Debug, Clone, Getters)]
pub struct RecordedEvent {
    /// The event row id (existing id when `created` is false)
    event_id: Uuid,
    /// Whether this call created the event
    created: bool,
    /// Ledger entries written by this call; empty on replay
    ledger_entry_ids: Vec<Uuid>,
}

/// One planned commission row, before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommission {
    /// Upline member who earns
    pub earner_id: Uuid,
    /// Distance from the buyer, 1-based
    pub level: i32,
    /// Basis points applied
    pub rate_bps: i32,
    /// `floor(amount * rate / 10000)`
    pub amount_cents: i64,
}

/// Plan commission rows for an event.
///
/// `upline` is the buyer's ancestor chain, nearest first, each with its
/// current enablement flag. Disabled earners are skipped without shifting
/// the levels of those behind them; amounts that floor to zero are dropped.
pub fn plan_commissions(
    event_type: AffiliateEventType,
    amount_cents: i64,
    upline: &[(Uuid, bool)],
) -> Vec<PlannedCommission> {
    upline
        .iter()
        .take(MAX_COMMISSION_LEVELS)
        .enumerate()
        .filter_map(|(index, (earner_id, enabled))| {
            let level = (index + 1) as u8;
            if !enabled {
                debug!(earner_id = %earner_id, level, "Upline member not enabled, skipping");
                return None;
            }
            let rate = rate_bps(event_type, level)?;
            let amount = commission_amount_cents(amount_cents, rate);
            if amount <= 0 {
                debug!(earner_id = %earner_id, level, "Commission floors to zero, skipping");
                return None;
            }
            Some(PlannedCommission {
                earner_id: *earner_id,
                level: level as i32,
                rate_bps: rate as i32,
                amount_cents: amount,
            })
        })
        .collect()
}

/// Record a monetizable action and its commission ledger rows.
///
/// Safe to call any number of times with the same `external_ref`: exactly one
/// event row exists per ref, and ledger rows are only ever written by the
/// call that created the event. A concurrent duplicate delivery that loses
/// the insert race is absorbed via the unique constraint on `external_ref`.
///
/// # Errors
///
/// Returns an error if the amount is not positive, the buyer does not exist,
/// or a query fails.
#[instrument(skip(conn, request), fields(external_ref = %request.external_ref, event_type = %request.event_type))]
pub fn record_affiliate_event(
    conn: &mut PgConnection,
    request: &EventRequest,
) -> EventResult<RecordedEvent> {
    if request.amount_cents <= 0 {
        return Err(EventError::new(EventErrorKind::InvalidAmount(
            request.amount_cents,
        )));
    }

    if let Some(existing) = find_event_id(conn, &request.external_ref)? {
        debug!(event_id = %existing, "Event already recorded for this ref");
        return Ok(RecordedEvent {
            event_id: existing,
            created: false,
            ledger_entry_ids: Vec::new(),
        });
    }

    let buyer = load_profile(conn, request.buyer_id)
        .map_err(EventError::from)?
        .ok_or_else(|| {
            EventError::new(EventErrorKind::BuyerNotFound(request.buyer_id.to_string()))
        })?;

    let event_id = Uuid::new_v4();
    let new_event = NewAffiliateEvent {
        id: event_id,
        buyer_id: request.buyer_id,
        shop_id: request.shop_id,
        event_type: request.event_type.to_string(),
        amount_cents: request.amount_cents,
        classifier_code: request.classifier_code.clone(),
        external_ref: request.external_ref.clone(),
    };

    if let Err(err) = diesel::insert_into(affiliate_events::table)
        .values(&new_event)
        .execute(conn)
        .map_err(DatabaseError::from)
    {
        if err.is_unique_violation() {
            // Concurrent delivery won the insert race; its ledger rows are
            // authoritative.
            debug!("Duplicate external_ref insert race, treating as already recorded");
            let existing = find_event_id(conn, &request.external_ref)?.ok_or(err)?;
            return Ok(RecordedEvent {
                event_id: existing,
                created: false,
                ledger_entry_ids: Vec::new(),
            });
        }
        return Err(err.into());
    }

    let path = decode_path(buyer.referral_path.as_deref()).map_err(EventError::from)?;
    if path.is_empty() {
        info!(event_id = %event_id, "Recorded event with no upline");
        return Ok(RecordedEvent {
            event_id,
            created: true,
            ledger_entry_ids: Vec::new(),
        });
    }

    let upline = upline_enablement(conn, path.ancestors())?;
    let planned = plan_commissions(request.event_type, request.amount_cents, &upline);

    let entries: Vec<NewCommissionLedgerEntry> = planned
        .iter()
        .map(|p| NewCommissionLedgerEntry {
            id: Uuid::new_v4(),
            event_id,
            earner_id: p.earner_id,
            buyer_id: request.buyer_id,
            level: p.level,
            rate_bps: p.rate_bps,
            amount_cents: p.amount_cents,
            status: LedgerStatus::Pending.to_string(),
        })
        .collect();

    if !entries.is_empty() {
        diesel::insert_into(commission_ledger::table)
            .values(&entries)
            .execute(conn)
            .map_err(DatabaseError::from)?;
    }

    let ledger_entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
    info!(
        event_id = %event_id,
        commissions = ledger_entry_ids.len(),
        "Recorded affiliate event"
    );
    Ok(RecordedEvent {
        event_id,
        created: true,
        ledger_entry_ids,
    })
}

fn find_event_id(conn: &mut PgConnection, external_ref: &str) -> EventResult<Option<Uuid>> {
    affiliate_events::table
        .filter(affiliate_events::external_ref.eq(external_ref))
        .select(affiliate_events::id)
        .first(conn)
        .optional()
        .map_err(|e| EventError::from(DatabaseError::from(e)))
}

/// Fetch enablement flags for the upline chain in one query, preserving
/// chain order. Ids missing from the profiles table count as disabled.
fn upline_enablement(
    conn: &mut PgConnection,
    ancestors: &[Uuid],
) -> EventResult<Vec<(Uuid, bool)>> {
    let rows: Vec<(Uuid, bool)> = affiliate_profiles::table
        .filter(affiliate_profiles::id.eq_any(ancestors))
        .select((
            affiliate_profiles::id,
            affiliate_profiles::is_affiliate_enabled,
        ))
        .load(conn)
        .map_err(|e| EventError::from(DatabaseError::from(e)))?;
    let flags: HashMap<Uuid, bool> = rows.into_iter().collect();
    Ok(ancestors
        .iter()
        .map(|id| (*id, flags.get(id).copied().unwrap_or(false)))
        .collect())
}
