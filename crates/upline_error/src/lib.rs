//! Error types for the Upline affiliate commission engine.
//!
//! This crate provides the foundation error types used throughout the Upline
//! workspace. Each domain (database access, referral graph, event recording,
//! ledger transitions, payouts) gets its own kind enum and an error struct
//! that captures the source location where the failure was raised.
//!
//! The `database` feature enables conversions from Diesel errors, mapping
//! missing rows and unique-constraint violations to distinct kinds so callers
//! can absorb idempotency races without string matching.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod database;
mod event;
mod ledger;
mod payout;
mod referral;

pub use database::{DatabaseError, DatabaseErrorKind};
pub use event::{EventError, EventErrorKind};
pub use ledger::{LedgerError, LedgerErrorKind};
pub use payout::{PayoutError, PayoutErrorKind};
pub use referral::{ReferralError, ReferralErrorKind};

/// Result alias for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Result alias for referral graph and enablement operations.
pub type ReferralResult<T> = Result<T, ReferralError>;

/// Result alias for affiliate event recording.
pub type EventResult<T> = Result<T, EventError>;

/// Result alias for commission ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result alias for payout operations.
pub type PayoutResult<T> = Result<T, PayoutError>;

/// Result alias for downline tree projections, which only fail on reads.
pub type TeamResult<T> = Result<T, DatabaseError>;
