//! Payout request statuses and admin actions.

use serde::{Deserialize, Serialize};

/// Smallest payout an affiliate may request, in currency minor units.
pub const MIN_PAYOUT_CENTS: i64 = 10_000;

/// Lifecycle status of a payout request.
///
/// Persisted as the exact strings `REQUESTED` / `APPROVED` / `PAID` /
/// `REJECTED`. PAID and REJECTED are terminal.
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
pub enum PayoutStatus {
    /// Submitted by the affiliate, awaiting admin review
    Requested,
    /// Approved by an admin, awaiting transfer
    Approved,
    /// Transferred; terminal
    Paid,
    /// Declined; terminal
    Rejected,
}

/// Admin action on a payout request.
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
pub enum PayoutAction {
    /// REQUESTED -> APPROVED
    Approve,
    /// APPROVED -> PAID
    MarkPaid,
    /// REQUESTED or APPROVED -> REJECTED
    Reject,
}

impl PayoutAction {
    /// Resulting status when this action is applied to `current`, or `None`
    /// if the transition is illegal.
    pub fn apply(self, current: PayoutStatus) -> Option<PayoutStatus> {
        match (self, current) {
            (PayoutAction::Approve, PayoutStatus::Requested) => Some(PayoutStatus::Approved),
            (
                PayoutAction::Approve,
                PayoutStatus::Approved | PayoutStatus::Paid | PayoutStatus::Rejected,
            ) => None,
            (PayoutAction::MarkPaid, PayoutStatus::Approved) => Some(PayoutStatus::Paid),
            (
                PayoutAction::MarkPaid,
                PayoutStatus::Requested | PayoutStatus::Paid | PayoutStatus::Rejected,
            ) => None,
            (PayoutAction::Reject, PayoutStatus::Requested | PayoutStatus::Approved) => {
                Some(PayoutStatus::Rejected)
            }
            (PayoutAction::Reject, PayoutStatus::Paid | PayoutStatus::Rejected) => None,
        }
    }

    /// User-facing message for an illegal transition attempt.
    pub fn rejection_message(self) -> &'static str {
        match self {
            PayoutAction::Approve => "Only requested payouts can be approved",
            PayoutAction::MarkPaid => "Only approved payouts can be marked as paid",
            PayoutAction::Reject => "Only requested or approved payouts can be rejected",
        }
    }

    /// Action name recorded in the audit trail.
    pub fn audit_name(self) -> &'static str {
        match self {
            PayoutAction::Approve => "payout.approve",
            PayoutAction::MarkPaid => "payout.mark_paid",
            PayoutAction::Reject => "payout.reject",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(PayoutStatus::Requested.to_string(), "REQUESTED");
        assert_eq!(PayoutStatus::Rejected.to_string(), "REJECTED");
        assert_eq!(
            "REQUESTED".parse::<PayoutStatus>().unwrap(),
            PayoutStatus::Requested
        );
    }

    #[test]
    fn paid_and_rejected_are_terminal() {
        for action in [PayoutAction::Approve, PayoutAction::MarkPaid, PayoutAction::Reject] {
            assert_eq!(action.apply(PayoutStatus::Paid), None);
            assert_eq!(action.apply(PayoutStatus::Rejected), None);
        }
    }

    #[test]
    fn happy_path_transitions() {
        assert_eq!(
            PayoutAction::Approve.apply(PayoutStatus::Requested),
            Some(PayoutStatus::Approved)
        );
        assert_eq!(
            PayoutAction::MarkPaid.apply(PayoutStatus::Approved),
            Some(PayoutStatus::Paid)
        );
        assert_eq!(
            PayoutAction::Reject.apply(PayoutStatus::Requested),
            Some(PayoutStatus::Rejected)
        );
        assert_eq!(
            PayoutAction::Reject.apply(PayoutStatus::Approved),
            Some(PayoutStatus::Rejected)
        );
    }
}
