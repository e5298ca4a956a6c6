//! Downline tree projection.
//!
//! Read-only reconstruction of the 3-level team under a root affiliate from
//! the flat path encoding. Informational path: missing joined data degrades
//! to "unclassified" instead of failing the whole view.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use tracing::{instrument, warn};
use upline_core::AffiliateEventType;
use upline_database::AffiliateProfileRow;
use upline_database::schema::{affiliate_events, affiliate_profiles, commission_ledger};
use upline_error::{DatabaseError, TeamResult};
use uuid::Uuid;

use crate::ledger::{EarningsSummary, fold_earnings};
use crate::referral::decode_path;

/// One member of a root affiliate's downline.
#[derive(Debug, Clone, Getters, serde::Serialize)]
pub struct DownlineMember {
    /// Member id
    member_id: Uuid,
    /// Distance from the root: 1 = directly referred by the root
    level: u8,
    /// The member's own direct referrer
    referred_by: Option<Uuid>,
    /// When the member joined
    joined_at: NaiveDateTime,
    /// Members directly referred by this member
    direct_children: i64,
    /// Commission cents this member has generated for the root as a buyer
    total_commission_cents: i64,
    /// Most recent commission-generating purchase
    last_contribution_at: Option<NaiveDateTime>,
    /// Contributions classified as package purchases
    package_purchase_count: i64,
    /// Contributions classified as credit top-ups
    credit_topup_count: i64,
    /// Contributions whose originating event could not be classified
    unclassified_count: i64,
}

/// Aggregate view over a root affiliate's downline.
#[derive(Debug, Clone, Getters, serde::Serialize)]
pub struct TeamSummary {
    /// Total downline size across all three levels
    total_members: i64,
    /// Members at level 1 (direct referrals)
    level_1_count: i64,
    /// Members at level 2
    level_2_count: i64,
    /// Members at level 3
    level_3_count: i64,
    /// The root's lifetime earnings, split by ledger status
    earnings: EarningsSummary,
}

/// Reconstruct the 3-level downline of `root_id`.
///
/// Scans members whose stored path contains the root, classifying each by
/// the root's position in its path (index 0/1/2 -> level 1/2/3). The LIKE
/// scan is a prefilter; the decoded path is authoritative. Rows whose path
/// fails to decode are skipped with a warning rather than failing the view.
///
/// # Errors
///
/// Returns an error only on query failure.
#[instrument(skip(conn), fields(root_id = %root_id))]
pub fn downline_tree(
    conn: &mut PgConnection,
    root_id: Uuid,
) -> TeamResult<Vec<DownlineMember>> {
    let candidates: Vec<AffiliateProfileRow> = affiliate_profiles::table
        .filter(affiliate_profiles::referral_path.like(format!("%{}%", root_id)))
        .load(conn)
        .map_err(DatabaseError::from)?;

    // Classify by decoded path; the LIKE match alone is not trusted.
    let mut members: Vec<(AffiliateProfileRow, u8)> = Vec::with_capacity(candidates.len());
    for row in candidates {
        let path = match decode_path(row.referral_path.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                warn!(member_id = %row.id, error = %e, "Skipping member with corrupt path");
                continue;
            }
        };
        if let Some(level) = path.level_of(root_id) {
            members.push((row, level));
        }
    }
    if members.is_empty() {
        return Ok(Vec::new());
    }
    let member_ids: Vec<Uuid> = members.iter().map(|(row, _)| row.id).collect();

    // Direct-children counts for every downline member, one query.
    let child_rows: Vec<Option<Uuid>> = affiliate_profiles::table
        .filter(affiliate_profiles::referred_by.eq_any(&member_ids))
        .select(affiliate_profiles::referred_by)
        .load(conn)
        .map_err(DatabaseError::from)?;
    let mut children: HashMap<Uuid, i64> = HashMap::new();
    for parent in child_rows.into_iter().flatten() {
        *children.entry(parent).or_insert(0) += 1;
    }

    // Commissions each member generated for the root, joined back to the
    // originating event for classification. Left join: a missing event row
    // degrades to unclassified.
    let contribution_rows: Vec<(Uuid, i64, NaiveDateTime, Option<String>)> =
        commission_ledger::table
            .left_join(affiliate_events::table)
            .filter(commission_ledger::earner_id.eq(root_id))
            .filter(commission_ledger::buyer_id.eq_any(&member_ids))
            .select((
                commission_ledger::buyer_id,
                commission_ledger::amount_cents,
                commission_ledger::created_at,
                affiliate_events::event_type.nullable(),
            ))
            .load(conn)
            .map_err(DatabaseError::from)?;

    #[derive(Default)]
    struct Contribution {
        total_cents: i64,
        last_at: Option<NaiveDateTime>,
        packages: i64,
        topups: i64,
        unclassified: i64,
    }
    let mut contributions: HashMap<Uuid, Contribution> = HashMap::new();
    for (buyer_id, amount, created_at, event_type) in contribution_rows {
        let entry = contributions.entry(buyer_id).or_default();
        entry.total_cents += amount;
        entry.last_at = Some(entry.last_at.map_or(created_at, |t| t.max(created_at)));
        match event_type
            .as_deref()
            .and_then(|raw| raw.parse::<AffiliateEventType>().ok())
        {
            Some(AffiliateEventType::PackagePurchase) => entry.packages += 1,
            Some(AffiliateEventType::CreditTopup) => entry.topups += 1,
            None => {
                warn!(buyer_id = %buyer_id, "Ledger row with unclassifiable event");
                entry.unclassified += 1;
            }
        }
    }

    let mut tree: Vec<DownlineMember> = members
        .into_iter()
        .map(|(row, level)| {
            let contribution = contributions.remove(&row.id).unwrap_or_default();
            DownlineMember {
                member_id: row.id,
                level,
                referred_by: row.referred_by,
                joined_at: row.created_at,
                direct_children: children.get(&row.id).copied().unwrap_or(0),
                total_commission_cents: contribution.total_cents,
                last_contribution_at: contribution.last_at,
                package_purchase_count: contribution.packages,
                credit_topup_count: contribution.topups,
                unclassified_count: contribution.unclassified,
            }
        })
        .collect();
    tree.sort_by(|a, b| (a.level, a.joined_at).cmp(&(b.level, b.joined_at)));
    Ok(tree)
}

/// Summary statistics over the downline of `root_id`.
///
/// # Errors
///
/// Returns an error on query failure or a corrupt ledger status value.
#[instrument(skip(conn), fields(root_id = %root_id))]
pub fn team_summary(conn: &mut PgConnection, root_id: Uuid) -> TeamResult<TeamSummary> {
    let tree = downline_tree(conn, root_id)?;
    let mut level_counts = [0_i64; 3];
    for member in &tree {
        if let Some(slot) = level_counts.get_mut((member.level - 1) as usize) {
            *slot += 1;
        }
    }
    let earnings = fold_earnings(conn, root_id)?;
    Ok(TeamSummary {
        total_members: tree.len() as i64,
        level_1_count: level_counts[0],
        level_2_count: level_counts[1],
        level_3_count: level_counts[2],
        earnings,
    })
}
