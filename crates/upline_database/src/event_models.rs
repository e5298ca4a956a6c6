//! Diesel models for affiliate events and the commission ledger.

use chrono::NaiveDateTime;
use derive_builder::Builder;
use derive_getters::Getters;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// Database row for the affiliate_events table.
///
/// One row per monetizable action. Create-only: rows are never mutated after
/// insert, and `external_ref` is globally unique so retried deliveries
/// collapse onto one event.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::affiliate_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AffiliateEventRow {
    /// Event id
    pub id: Uuid,
    /// Member whose purchase triggered the event
    pub buyer_id: Uuid,
    /// Shop the purchase happened in, when applicable
    pub shop_id: Option<Uuid>,
    /// `PACKAGE_PURCHASE` or `CREDIT_TOPUP`
    pub event_type: String,
    /// Base amount commissions are computed from, in minor units
    pub amount_cents: i64,
    /// Denormalized package/top-up classifier
    pub classifier_code: Option<String>,
    /// Caller-supplied idempotency key
    pub external_ref: String,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the affiliate_events table with builder pattern.
#[derive(Debug, Clone, Insertable, Getters, Builder)]
#[diesel(table_name = crate::schema::affiliate_events)]
#[builder(setter(into))]
pub struct NewAffiliateEvent {
    /// Event id
    pub id: Uuid,
    /// Buyer id
    pub buyer_id: Uuid,
    /// Shop id, when applicable
    #[builder(default)]
    pub shop_id: Option<Uuid>,
    /// Event type string
    pub event_type: String,
    /// Base amount in minor units
    pub amount_cents: i64,
    /// Package/top-up classifier
    #[builder(default)]
    pub classifier_code: Option<String>,
    /// Idempotency key
    pub external_ref: String,
}

/// Database row for the commission_ledger table.
///
/// One row per (event, earning upline member). Rows are never deleted, only
/// transitioned in place by admin actions.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::commission_ledger)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommissionLedgerRow {
    /// Ledger entry id
    pub id: Uuid,
    /// Owning event
    pub event_id: Uuid,
    /// Upline member who earns this commission
    pub earner_id: Uuid,
    /// Buyer, denormalized from the event
    pub buyer_id: Uuid,
    /// Distance from the buyer: 1 = direct referrer, up to 3
    pub level: i32,
    /// Basis points applied
    pub rate_bps: i32,
    /// `floor(event.amount_cents * rate_bps / 10000)`
    pub amount_cents: i64,
    /// `PENDING`, `APPROVED`, `PAID`, or `REVERSED`
    pub status: String,
    /// Free-text note, set on reversal
    pub note: Option<String>,
    /// When the entry was approved
    pub approved_at: Option<NaiveDateTime>,
    /// When the entry was paid
    pub paid_at: Option<NaiveDateTime>,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the commission_ledger table with builder pattern.
#[derive(Debug, Clone, Insertable, Getters, Builder)]
#[diesel(table_name = crate::schema::commission_ledger)]
#[builder(setter(into))]
pub struct NewCommissionLedgerEntry {
    /// Ledger entry id
    pub id: Uuid,
    /// Owning event
    pub event_id: Uuid,
    /// Earning upline member
    pub earner_id: Uuid,
    /// Buyer
    pub buyer_id: Uuid,
    /// Level 1..=3
    pub level: i32,
    /// Basis points applied
    pub rate_bps: i32,
    /// Commission amount in minor units
    pub amount_cents: i64,
    /// Initial status (always `PENDING` when created by the recorder)
    pub status: String,
}
