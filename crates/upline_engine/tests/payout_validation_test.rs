//! Tests for payout amount validation boundaries.

use upline_core::MIN_PAYOUT_CENTS;
use upline_engine::validate_payout_amount;
use upline_error::PayoutErrorKind;

#[test]
fn exactly_minimum_with_matching_balance_passes() {
    assert!(validate_payout_amount(MIN_PAYOUT_CENTS, MIN_PAYOUT_CENTS).is_ok());
}

#[test]
fn one_cent_below_minimum_fails_with_minimum_error() {
    let err = validate_payout_amount(MIN_PAYOUT_CENTS - 1, MIN_PAYOUT_CENTS).unwrap_err();
    match err.kind {
        PayoutErrorKind::BelowMinimum {
            amount_cents,
            minimum_cents,
        } => {
            assert_eq!(amount_cents, MIN_PAYOUT_CENTS - 1);
            assert_eq!(minimum_cents, MIN_PAYOUT_CENTS);
        }
        other => panic!("expected BelowMinimum, got {:?}", other),
    }
}

#[test]
fn one_cent_over_balance_fails_with_balance_error() {
    let available = MIN_PAYOUT_CENTS + 500;
    let err = validate_payout_amount(available + 1, available).unwrap_err();
    match err.kind {
        PayoutErrorKind::InsufficientBalance {
            amount_cents,
            available_cents,
        } => {
            assert_eq!(amount_cents, available + 1);
            assert_eq!(available_cents, available);
        }
        other => panic!("expected InsufficientBalance, got {:?}", other),
    }
}

#[test]
fn minimum_check_applies_before_balance_check() {
    // Both constraints violated: the minimum violation is what the user sees.
    let err = validate_payout_amount(10, 0).unwrap_err();
    assert!(matches!(err.kind, PayoutErrorKind::BelowMinimum { .. }));
}

#[test]
fn messages_name_the_violated_constraint() {
    let below = validate_payout_amount(MIN_PAYOUT_CENTS - 1, MIN_PAYOUT_CENTS).unwrap_err();
    assert!(below.to_string().contains("Minimum payout amount"));

    let over = validate_payout_amount(MIN_PAYOUT_CENTS, 0).unwrap_err();
    assert!(over.to_string().contains("available for payout"));
}
