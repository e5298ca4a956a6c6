//! Multi-level affiliate commission engine.
//!
//! This crate implements the commission core over the tables owned by
//! `upline_database`:
//!
//! 1. **Referral graph** - binds a member to an upline referrer once,
//!    maintaining the bounded 3-ancestor path (first-referrer-wins).
//! 2. **Enablement gate** - idempotently turns a profile into a
//!    commission-earning affiliate with a unique referral code.
//! 3. **Event recorder** - records monetizable actions exactly once per
//!    idempotency key and writes tiered PENDING ledger rows for the enabled
//!    upline.
//! 4. **Ledger state machine** - admin-gated batch transitions over
//!    commission entries, all-or-nothing, audit-logged.
//! 5. **Payout reconciler** - available-balance computation with optimistic
//!    reservation and the payout request lifecycle.
//! 6. **Team projection** - read-only downline tree and summary views.
//!
//! Every operation is a short-lived, request-scoped unit of work over a
//! single connection. Races are resolved with conditional updates and unique
//! constraints, never locks; a lost race surfaces as a typed outcome or a
//! retryable conflict error.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod audit;
mod enablement;
mod events;
mod ledger;
mod payout;
mod referral;
mod team;

pub use audit::{record_audit, recent_audit_records};
pub use enablement::ensure_affiliate_enabled;
pub use events::{
    EventRequest, EventRequestBuilder, PlannedCommission, RecordedEvent, plan_commissions,
    record_affiliate_event,
};
pub use ledger::{
    EarningsSummary, LedgerTransition, apply_ledger_action, earnings_summary,
    ledger_entries_for_earner, pending_ledger_entries,
};
pub use payout::{
    BankInfo, apply_payout_action, available_payout_cents, create_payout_request,
    payout_requests_for_user, validate_payout_amount,
};
pub use referral::{BindOutcome, bind_referral_if_eligible};
pub use team::{DownlineMember, TeamSummary, downline_tree, team_summary};
