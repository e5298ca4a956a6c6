//! Affiliate enablement gate.
//!
//! Idempotent "get or create" for commission-earning status. Enablement is a
//! side effect of a purchase-approval workflow, not a standalone user action.

use diesel::prelude::*;
use tracing::{debug, instrument};
use upline_core::{MAX_CODE_ATTEMPTS, code_candidate};
use upline_database::AffiliateProfileRow;
use upline_database::schema::affiliate_profiles::dsl as profiles;
use upline_error::{DatabaseError, ReferralError, ReferralErrorKind, ReferralResult};
use uuid::Uuid;

use crate::referral::load_profile;

/// Ensure `member_id` is an enabled affiliate with a referral code.
///
/// Already enabled with a code: returns the row unchanged. Otherwise assigns
/// a unique 8-character code (bounded retry loop) and sets the enablement
/// flag. The first-enable timestamp is sticky: re-enabling a member that was
/// enabled before keeps the original `affiliate_enabled_at`.
///
/// # Errors
///
/// Returns an error if the member does not exist, if no unique code could be
/// allocated within [`MAX_CODE_ATTEMPTS`] tries, or on query failure.
#[instrument(skip(conn), fields(member_id = %member_id))]
pub fn ensure_affiliate_enabled(
    conn: &mut PgConnection,
    member_id: Uuid,
) -> ReferralResult<AffiliateProfileRow> {
    let profile = load_profile(conn, member_id)?.ok_or_else(|| {
        ReferralError::new(ReferralErrorKind::MemberNotFound(member_id.to_string()))
    })?;

    if profile.is_affiliate_enabled && profile.referral_code.is_some() {
        debug!("Member already enabled");
        return Ok(profile);
    }

    let code = match profile.referral_code.clone() {
        Some(existing) => existing,
        None => allocate_referral_code(conn, member_id)?,
    };
    let enabled_at = profile
        .affiliate_enabled_at
        .unwrap_or_else(|| chrono::Utc::now().naive_utc());

    let updated: AffiliateProfileRow = diesel::update(profiles::affiliate_profiles.find(member_id))
        .set((
            profiles::referral_code.eq(&code),
            profiles::is_affiliate_enabled.eq(true),
            profiles::affiliate_enabled_at.eq(enabled_at),
            profiles::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .get_result(conn)
        .map_err(DatabaseError::from)?;

    debug!(code = %code, "Member enabled as affiliate");
    Ok(updated)
}

/// Allocate a referral code no other profile holds.
///
/// Check-then-assign with a bounded retry loop; the unique constraint on the
/// column is the backstop if two allocations race between check and write.
fn allocate_referral_code(conn: &mut PgConnection, member_id: Uuid) -> ReferralResult<String> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let candidate = code_candidate(member_id);
        let taken: i64 = profiles::affiliate_profiles
            .filter(profiles::referral_code.eq(&candidate))
            .count()
            .get_result(conn)
            .map_err(DatabaseError::from)?;
        if taken == 0 {
            debug!(attempt, "Allocated referral code");
            return Ok(candidate);
        }
    }
    Err(ReferralError::new(ReferralErrorKind::CodeGeneration(
        format!("no unique code found in {} attempts", MAX_CODE_ATTEMPTS),
    )))
}
