//! Diesel models for payout requests and the audit log.

use chrono::NaiveDateTime;
use derive_builder::Builder;
use derive_getters::Getters;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// Database row for the payout_requests table.
///
/// Created by an affiliate against their computed available balance; advanced
/// only by admin actions. Immutable once `PAID` or `REJECTED`.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::payout_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PayoutRequestRow {
    /// Payout request id
    pub id: Uuid,
    /// Affiliate requesting the withdrawal
    pub user_id: Uuid,
    /// Requested amount in minor units
    pub amount_cents: i64,
    /// `REQUESTED`, `APPROVED`, `PAID`, or `REJECTED`
    pub status: String,
    /// Receiving bank
    pub bank_name: String,
    /// Account holder name
    pub account_name: String,
    /// Account number
    pub account_number: String,
    /// Free-text note from the affiliate
    pub note: Option<String>,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
    /// When an admin approved the request
    pub approved_at: Option<NaiveDateTime>,
    /// When the transfer was marked done
    pub paid_at: Option<NaiveDateTime>,
}

/// Insertable struct for the payout_requests table with builder pattern.
#[derive(Debug, Clone, Insertable, Getters, Builder)]
#[diesel(table_name = crate::schema::payout_requests)]
#[builder(setter(into))]
pub struct NewPayoutRequest {
    /// Payout request id
    pub id: Uuid,
    /// Requesting affiliate
    pub user_id: Uuid,
    /// Requested amount in minor units
    pub amount_cents: i64,
    /// Initial status (always `REQUESTED` at creation)
    pub status: String,
    /// Receiving bank
    pub bank_name: String,
    /// Account holder name
    pub account_name: String,
    /// Account number
    pub account_number: String,
    /// Free-text note
    #[builder(default)]
    pub note: Option<String>,
}

/// Database row for the affiliate_audit_log table.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::affiliate_audit_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditRecordRow {
    /// Audit record id
    pub id: i64,
    /// Action name, e.g. `ledger.approve`
    pub action: String,
    /// Admin who performed the action
    pub actor_id: String,
    /// Ids of the affected rows
    pub target_ids: Vec<String>,
    /// Structured context (before/after status, amounts)
    pub context: Option<serde_json::Value>,
    /// Free-text note
    pub note: Option<String>,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the affiliate_audit_log table.
#[derive(Debug, Clone, Insertable, Getters, Builder)]
#[diesel(table_name = crate::schema::affiliate_audit_log)]
#[builder(setter(into))]
pub struct NewAuditRecord {
    /// Action name
    pub action: String,
    /// Admin who performed the action
    pub actor_id: String,
    /// Ids of the affected rows
    pub target_ids: Vec<String>,
    /// Structured context
    #[builder(default)]
    pub context: Option<serde_json::Value>,
    /// Free-text note
    #[builder(default)]
    pub note: Option<String>,
}

/// Convenience constructor used by state-machine call sites.
impl NewAuditRecord {
    /// Build an audit record for `action` over `target_ids`.
    pub fn for_targets(
        action: impl Into<String>,
        actor_id: impl Into<String>,
        target_ids: &[Uuid],
    ) -> Self {
        Self {
            action: action.into(),
            actor_id: actor_id.into(),
            target_ids: target_ids.iter().map(Uuid::to_string).collect(),
            context: None,
            note: None,
        }
    }

    /// Attach structured context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach a free-text note.
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}
