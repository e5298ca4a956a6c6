//! Upline: a multi-level affiliate commission engine.
//!
//! Attributes purchases to an upline chain of referrers, computes tiered
//! commissions, records them in an append-only ledger with admin-gated state
//! transitions, and reconciles payouts against that ledger.
//!
//! # Architecture
//!
//! - [`upline_core`] - pure domain types: statuses, actions, the rate table,
//!   the bounded referral path.
//! - [`upline_database`] - Diesel schema, models, connections, migrations.
//! - [`upline_engine`] - the commission operations themselves.
//! - [`upline_error`] - per-domain error types with location tracking.
//!
//! # Example
//!
//! ```no_run
//! use upline::{EventRequestBuilder, record_affiliate_event};
//! use upline::AffiliateEventType;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = upline::establish_connection()?;
//! let request = EventRequestBuilder::default()
//!     .buyer_id(uuid::Uuid::new_v4())
//!     .event_type(AffiliateEventType::PackagePurchase)
//!     .amount_cents(10_000_i64)
//!     .external_ref("purchase-7:starter-plan")
//!     .build()?;
//! let recorded = record_affiliate_event(&mut conn, &request)?;
//! println!("event {} created={}", recorded.event_id(), recorded.created());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use upline_core::*;
pub use upline_database::*;
pub use upline_engine::*;
pub use upline_error::*;
