//! Diesel models for the affiliate_profiles table.

use chrono::NaiveDateTime;
use derive_builder::Builder;
use derive_getters::Getters;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// Database row for the affiliate_profiles table.
///
/// Engine-owned projection of a platform member: only the referral and
/// affiliate columns live here. `referred_by` is written at most once
/// (first-referrer-wins) and `referral_path` always encodes
/// `[referred_by] + referred_by.path` truncated to three ancestors.
#[derive(Debug, Clone, Serialize, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::affiliate_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AffiliateProfileRow {
    /// Member id (shared with the external profile store)
    pub id: Uuid,
    /// Unique code other members sign up with; assigned once on enablement
    pub referral_code: Option<String>,
    /// Direct upline referrer
    pub referred_by: Option<Uuid>,
    /// `>`-delimited ancestor chain, nearest first, max 3 entries
    pub referral_path: Option<String>,
    /// Whether this member currently earns commissions
    pub is_affiliate_enabled: bool,
    /// First time the member was enabled (sticky across re-enables)
    pub affiliate_enabled_at: Option<NaiveDateTime>,
    /// Record creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the affiliate_profiles table with builder pattern.
#[derive(Debug, Clone, Insertable, Getters, Builder)]
#[diesel(table_name = crate::schema::affiliate_profiles)]
#[builder(setter(into))]
pub struct NewAffiliateProfile {
    /// Member id
    pub id: Uuid,
    /// Referral code, if already assigned
    #[builder(default)]
    pub referral_code: Option<String>,
    /// Direct upline referrer
    #[builder(default)]
    pub referred_by: Option<Uuid>,
    /// Encoded ancestor chain
    #[builder(default)]
    pub referral_path: Option<String>,
    /// Whether this member earns commissions
    #[builder(default)]
    pub is_affiliate_enabled: bool,
    /// First-enable timestamp
    #[builder(default)]
    pub affiliate_enabled_at: Option<NaiveDateTime>,
}
