//! Core domain types for the Upline affiliate commission engine.
//!
//! This crate provides the pure domain layer shared across the workspace:
//! status and action sum types with their exact persisted string forms, the
//! static commission rate table, the bounded referral path encoding, and
//! referral code helpers. Nothing here touches the database.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod event_type;
mod ledger;
mod payout;
mod rates;
mod referral_code;
mod referral_path;

pub use event_type::AffiliateEventType;
pub use ledger::{LedgerAction, LedgerStatus};
pub use payout::{MIN_PAYOUT_CENTS, PayoutAction, PayoutStatus};
pub use rates::{
    COMMISSION_RATE_BPS, MAX_COMMISSION_LEVELS, commission_amount_cents, rate_bps,
};
pub use referral_code::{CODE_LENGTH, MAX_CODE_ATTEMPTS, code_candidate, normalize_code};
pub use referral_path::{MAX_REFERRAL_DEPTH, PATH_DELIMITER, ReferralPath};
