//! The commission rate table.
//!
//! Rates are a financial invariant and live in source, not configuration:
//! any change must go through review and show up in version control.

use crate::AffiliateEventType;

/// Maximum upline depth that earns commissions.
pub const MAX_COMMISSION_LEVELS: usize = 3;

/// Basis points per level (index 0 = level 1, the direct referrer).
pub const COMMISSION_RATE_BPS: [i64; MAX_COMMISSION_LEVELS] = [2500, 500, 300];

/// Basis-point rate for an event type at the given level (1-based).
///
/// Returns `None` outside levels 1..=3. Package purchases and credit top-ups
/// currently share one schedule; the lookup stays keyed by event type so the
/// table remains the single place a future split would land.
pub fn rate_bps(event_type: AffiliateEventType, level: u8) -> Option<i64> {
    let schedule = match event_type {
        AffiliateEventType::PackagePurchase => &COMMISSION_RATE_BPS,
        AffiliateEventType::CreditTopup => &COMMISSION_RATE_BPS,
    };
    match level {
        1..=3 => Some(schedule[(level - 1) as usize]),
        _ => None,
    }
}

/// Commission amount in minor units: `floor(amount_cents * rate_bps / 10000)`.
///
/// Widens to i128 for the intermediate product so large event amounts cannot
/// overflow.
pub fn commission_amount_cents(amount_cents: i64, rate_bps: i64) -> i64 {
    ((amount_cents as i128 * rate_bps as i128) / 10_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_table_levels() {
        for event_type in [
            AffiliateEventType::PackagePurchase,
            AffiliateEventType::CreditTopup,
        ] {
            assert_eq!(rate_bps(event_type, 1), Some(2500));
            assert_eq!(rate_bps(event_type, 2), Some(500));
            assert_eq!(rate_bps(event_type, 3), Some(300));
            assert_eq!(rate_bps(event_type, 0), None);
            assert_eq!(rate_bps(event_type, 4), None);
        }
    }

    #[test]
    fn conservation_on_round_amount() {
        assert_eq!(commission_amount_cents(10_000, 2500), 2_500);
        assert_eq!(commission_amount_cents(10_000, 500), 500);
        assert_eq!(commission_amount_cents(10_000, 300), 300);
    }

    #[test]
    fn amounts_floor_not_round() {
        // 999 * 300 / 10000 = 29.97 -> 29
        assert_eq!(commission_amount_cents(999, 300), 29);
        // 33 * 2500 / 10000 = 8.25 -> 8
        assert_eq!(commission_amount_cents(33, 2500), 8);
    }

    #[test]
    fn tiny_amounts_floor_to_zero() {
        assert_eq!(commission_amount_cents(3, 300), 0);
        assert_eq!(commission_amount_cents(1, 500), 0);
    }

    #[test]
    fn large_amounts_do_not_overflow() {
        let amount = i64::MAX / 2;
        let expected = (amount as i128 * 2500 / 10_000) as i64;
        assert_eq!(commission_amount_cents(amount, 2500), expected);
    }
}
