//! PostgreSQL integration for the Upline affiliate commission engine.
//!
//! Provides the Diesel schema, row/insert models for the five engine tables,
//! connection and pool helpers, and embedded migrations. All mutation policy
//! lives in `upline_engine`; this crate only knows shapes and connections.

#![forbid(unsafe_code)]

mod connection;
mod event_models;
mod payout_models;
mod profile_models;
pub mod schema;

pub use connection::{
    MIGRATIONS, PgPool, create_pool, establish_connection, run_migrations,
};
pub use event_models::{
    AffiliateEventRow, CommissionLedgerRow, NewAffiliateEvent, NewAffiliateEventBuilder,
    NewCommissionLedgerEntry, NewCommissionLedgerEntryBuilder,
};
pub use payout_models::{
    AuditRecordRow, NewAuditRecord, NewAuditRecordBuilder, NewPayoutRequest,
    NewPayoutRequestBuilder, PayoutRequestRow,
};
pub use profile_models::{AffiliateProfileRow, NewAffiliateProfile, NewAffiliateProfileBuilder};
