//! Commission ledger statuses and admin actions.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a commission ledger entry.
///
/// Persisted as the exact strings `PENDING` / `APPROVED` / `PAID` / `REVERSED`.
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
pub enum LedgerStatus {
    /// Created by the event recorder, awaiting admin review
    Pending,
    /// Approved for payout; counts toward available balance
    Approved,
    /// Paid out to the earner
    Paid,
    /// Voided; terminal
    Reversed,
}

/// Admin action on one or more ledger entries.
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
pub enum LedgerAction {
    /// PENDING -> APPROVED
    Approve,
    /// APPROVED -> PAID
    MarkPaid,
    /// Any non-REVERSED status -> REVERSED
    Reverse,
}

impl LedgerAction {
    /// Resulting status when this action is applied to `current`, or `None`
    /// if the transition is illegal.
    ///
    /// Reverse is deliberately legal from PAID: money already paid out can be
    /// reversed, on the assumption that the compensating payout correction
    /// happens out of band.
    pub fn apply(self, current: LedgerStatus) -> Option<LedgerStatus> {
        match (self, current) {
            (LedgerAction::Approve, LedgerStatus::Pending) => Some(LedgerStatus::Approved),
            (
                LedgerAction::Approve,
                LedgerStatus::Approved | LedgerStatus::Paid | LedgerStatus::Reversed,
            ) => None,
            (LedgerAction::MarkPaid, LedgerStatus::Approved) => Some(LedgerStatus::Paid),
            (
                LedgerAction::MarkPaid,
                LedgerStatus::Pending | LedgerStatus::Paid | LedgerStatus::Reversed,
            ) => None,
            (
                LedgerAction::Reverse,
                LedgerStatus::Pending | LedgerStatus::Approved | LedgerStatus::Paid,
            ) => Some(LedgerStatus::Reversed),
            (LedgerAction::Reverse, LedgerStatus::Reversed) => None,
        }
    }

    /// Past-tense verb for user-facing rejection messages.
    pub fn verb(self) -> &'static str {
        match self {
            LedgerAction::Approve => "approved",
            LedgerAction::MarkPaid => "marked as paid",
            LedgerAction::Reverse => "reversed",
        }
    }

    /// Action name recorded in the audit trail.
    pub fn audit_name(self) -> &'static str {
        match self {
            LedgerAction::Approve => "ledger.approve",
            LedgerAction::MarkPaid => "ledger.mark_paid",
            LedgerAction::Reverse => "ledger.reverse",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(LedgerStatus::Pending.to_string(), "PENDING");
        assert_eq!(LedgerStatus::Approved.to_string(), "APPROVED");
        assert_eq!(LedgerStatus::Paid.to_string(), "PAID");
        assert_eq!(LedgerStatus::Reversed.to_string(), "REVERSED");
        assert_eq!("PAID".parse::<LedgerStatus>().unwrap(), LedgerStatus::Paid);
        assert!("paid".parse::<LedgerStatus>().is_err());
    }

    #[test]
    fn approve_only_from_pending() {
        assert_eq!(
            LedgerAction::Approve.apply(LedgerStatus::Pending),
            Some(LedgerStatus::Approved)
        );
        assert_eq!(LedgerAction::Approve.apply(LedgerStatus::Approved), None);
        assert_eq!(LedgerAction::Approve.apply(LedgerStatus::Paid), None);
        assert_eq!(LedgerAction::Approve.apply(LedgerStatus::Reversed), None);
    }

    #[test]
    fn mark_paid_only_from_approved() {
        assert_eq!(
            LedgerAction::MarkPaid.apply(LedgerStatus::Approved),
            Some(LedgerStatus::Paid)
        );
        assert_eq!(LedgerAction::MarkPaid.apply(LedgerStatus::Pending), None);
        assert_eq!(LedgerAction::MarkPaid.apply(LedgerStatus::Paid), None);
        assert_eq!(LedgerAction::MarkPaid.apply(LedgerStatus::Reversed), None);
    }

    #[test]
    fn reverse_from_any_non_reversed() {
        assert_eq!(
            LedgerAction::Reverse.apply(LedgerStatus::Pending),
            Some(LedgerStatus::Reversed)
        );
        assert_eq!(
            LedgerAction::Reverse.apply(LedgerStatus::Approved),
            Some(LedgerStatus::Reversed)
        );
        assert_eq!(
            LedgerAction::Reverse.apply(LedgerStatus::Paid),
            Some(LedgerStatus::Reversed)
        );
        assert_eq!(LedgerAction::Reverse.apply(LedgerStatus::Reversed), None);
    }
}
