//! Monetizable action classification.

use serde::{Deserialize, Serialize};

/// The kind of monetizable action that triggers commissions.
///
/// Persisted as the exact strings `PACKAGE_PURCHASE` / `CREDIT_TOPUP`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliateEventType {
    /// A paid package (plan) purchase
    PackagePurchase,
    /// A credit top-up
    CreditTopup,
}
