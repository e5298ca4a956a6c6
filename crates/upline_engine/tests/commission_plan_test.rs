//! Tests for commission planning over an upline chain.

use upline_core::AffiliateEventType;
use upline_engine::plan_commissions;
use uuid::Uuid;

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

#[test]
fn full_enabled_upline_earns_tiered_rates() {
    let upline = vec![(id(1), true), (id(2), true), (id(3), true)];
    let planned = plan_commissions(AffiliateEventType::PackagePurchase, 10_000, &upline);

    assert_eq!(planned.len(), 3);
    assert_eq!(planned[0].earner_id, id(1));
    assert_eq!(planned[0].level, 1);
    assert_eq!(planned[0].rate_bps, 2500);
    assert_eq!(planned[0].amount_cents, 2_500);
    assert_eq!(planned[1].level, 2);
    assert_eq!(planned[1].amount_cents, 500);
    assert_eq!(planned[2].level, 3);
    assert_eq!(planned[2].amount_cents, 300);
}

#[test]
fn topup_uses_same_schedule() {
    let upline = vec![(id(1), true), (id(2), true), (id(3), true)];
    let planned = plan_commissions(AffiliateEventType::CreditTopup, 10_000, &upline);
    let amounts: Vec<i64> = planned.iter().map(|p| p.amount_cents).collect();
    assert_eq!(amounts, vec![2_500, 500, 300]);
}

#[test]
fn disabled_middle_upline_is_skipped_without_shifting_levels() {
    let upline = vec![(id(1), true), (id(2), false), (id(3), true)];
    let planned = plan_commissions(AffiliateEventType::PackagePurchase, 10_000, &upline);

    assert_eq!(planned.len(), 2);
    assert_eq!((planned[0].earner_id, planned[0].level), (id(1), 1));
    // Level 3 stays level 3: the disabled level-2 member does not promote it.
    assert_eq!((planned[1].earner_id, planned[1].level), (id(3), 3));
    assert_eq!(planned[1].rate_bps, 300);
}

#[test]
fn no_upline_plans_nothing() {
    let planned = plan_commissions(AffiliateEventType::PackagePurchase, 10_000, &[]);
    assert!(planned.is_empty());
}

#[test]
fn zero_floor_amounts_are_dropped() {
    // 10 cents: level 1 earns floor(10 * 0.25) = 2, levels 2 and 3 floor to 0.
    let upline = vec![(id(1), true), (id(2), true), (id(3), true)];
    let planned = plan_commissions(AffiliateEventType::PackagePurchase, 10, &upline);

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].level, 1);
    assert_eq!(planned[0].amount_cents, 2);
}

#[test]
fn upline_beyond_three_levels_is_ignored() {
    let upline = vec![
        (id(1), true),
        (id(2), true),
        (id(3), true),
        (id(4), true),
        (id(5), true),
    ];
    let planned = plan_commissions(AffiliateEventType::PackagePurchase, 10_000, &upline);
    assert_eq!(planned.len(), 3);
    assert!(planned.iter().all(|p| p.level <= 3));
}

#[test]
fn fully_disabled_upline_plans_nothing() {
    let upline = vec![(id(1), false), (id(2), false), (id(3), false)];
    let planned = plan_commissions(AffiliateEventType::CreditTopup, 10_000, &upline);
    assert!(planned.is_empty());
}
