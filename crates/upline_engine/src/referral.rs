//! Referral graph maintenance.
//!
//! Binds a new member to an upline referrer and keeps the bounded ancestor
//! path on the member row consistent. Binding is first-referrer-wins: once
//! `referred_by` is set it is never overwritten, which also makes cycles
//! impossible (a bound member can never be re-pointed, and self-referral is
//! rejected up front).

use diesel::prelude::*;
use tracing::{debug, instrument};
use upline_core::{ReferralPath, normalize_code};
use upline_database::AffiliateProfileRow;
use upline_database::schema::affiliate_profiles::dsl as profiles;
use upline_error::{
    DatabaseError, DatabaseErrorKind, ReferralError, ReferralErrorKind, ReferralResult,
};
use uuid::Uuid;

/// Outcome of a referral binding attempt.
///
/// Only `Bound` mutates state. The other variants report why nothing was
/// written; callers treat them as benign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The buyer was bound to the code's owner.
    Bound {
        /// Direct referrer the buyer is now attributed to
        referrer_id: Uuid,
        /// Ancestor path written to the buyer's row
        path: ReferralPath,
    },
    /// The buyer already has a referrer; first attribution wins.
    AlreadyBound {
        /// The referrer recorded by the earlier binding
        referred_by: Uuid,
    },
    /// No member owns the supplied code.
    CodeNotFound,
    /// The code resolves to the buyer itself.
    SelfReferral,
}

/// Bind `buyer_id` to the owner of `referral_code` if eligible.
///
/// The code is compared trimmed and uppercased. A buyer that is already
/// bound keeps its original referrer (repeated submissions cannot hijack
/// attribution). The write is a conditional update guarded by
/// `referred_by IS NULL`, so a concurrent double-bind loses cleanly and is
/// reported as [`BindOutcome::AlreadyBound`].
///
/// # Errors
///
/// Returns an error if the buyer row does not exist or a query fails.
#[instrument(skip(conn), fields(buyer_id = %buyer_id))]
pub fn bind_referral_if_eligible(
    conn: &mut PgConnection,
    buyer_id: Uuid,
    referral_code: &str,
) -> ReferralResult<BindOutcome> {
    let code = normalize_code(referral_code);

    let buyer = load_profile(conn, buyer_id)?
        .ok_or_else(|| ReferralError::new(ReferralErrorKind::MemberNotFound(buyer_id.to_string())))?;

    if let Some(existing) = buyer.referred_by {
        debug!(referred_by = %existing, "Buyer already bound, ignoring code");
        return Ok(BindOutcome::AlreadyBound {
            referred_by: existing,
        });
    }

    let referrer: Option<AffiliateProfileRow> = profiles::affiliate_profiles
        .filter(profiles::referral_code.eq(&code))
        .first(conn)
        .optional()
        .map_err(DatabaseError::from)?;

    let Some(referrer) = referrer else {
        debug!(code = %code, "Referral code not found");
        return Ok(BindOutcome::CodeNotFound);
    };

    if referrer.id == buyer_id {
        debug!("Self-referral attempt ignored");
        return Ok(BindOutcome::SelfReferral);
    }

    let referrer_path = decode_path(referrer.referral_path.as_deref())?;
    let path = ReferralPath::child_path(referrer.id, &referrer_path);

    let updated = diesel::update(
        profiles::affiliate_profiles
            .find(buyer_id)
            .filter(profiles::referred_by.is_null()),
    )
    .set((
        profiles::referred_by.eq(referrer.id),
        profiles::referral_path.eq(path.encode()),
        profiles::updated_at.eq(chrono::Utc::now().naive_utc()),
    ))
    .execute(conn)
    .map_err(DatabaseError::from)?;

    if updated == 0 {
        // Lost a concurrent binding race; read back the winner.
        let current: Option<Uuid> = profiles::affiliate_profiles
            .find(buyer_id)
            .select(profiles::referred_by)
            .first(conn)
            .map_err(DatabaseError::from)?;
        return match current {
            Some(referred_by) => {
                debug!(referred_by = %referred_by, "Concurrent binding won by another request");
                Ok(BindOutcome::AlreadyBound { referred_by })
            }
            None => Err(DatabaseError::new(DatabaseErrorKind::Conflict(
                "referral binding update affected no rows".to_string(),
            ))
            .into()),
        };
    }

    debug!(referrer_id = %referrer.id, path = %path, "Bound buyer to referrer");
    Ok(BindOutcome::Bound {
        referrer_id: referrer.id,
        path,
    })
}

/// Load a profile row by id, `None` if absent.
pub(crate) fn load_profile(
    conn: &mut PgConnection,
    member_id: Uuid,
) -> Result<Option<AffiliateProfileRow>, DatabaseError> {
    profiles::affiliate_profiles
        .find(member_id)
        .first(conn)
        .optional()
        .map_err(DatabaseError::from)
}

/// Decode a stored path column; a malformed value is corrupt data.
pub(crate) fn decode_path(encoded: Option<&str>) -> Result<ReferralPath, DatabaseError> {
    match encoded {
        None => Ok(ReferralPath::new()),
        Some(raw) => raw.parse().map_err(|e: uuid::Error| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "corrupt referral path '{}': {}",
                raw, e
            )))
        }),
    }
}
