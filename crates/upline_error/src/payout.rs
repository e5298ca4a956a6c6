//! Payout request and balance reconciliation error types.

use crate::DatabaseError;

/// Specific error conditions for payout operations.
#[derive(Debug, Clone)]
pub enum PayoutErrorKind {
    /// Payout request does not exist
    NotFound(String),
    /// Requesting member does not exist
    MemberNotFound(String),
    /// The requesting profile is not an enabled affiliate
    NotEnabled,
    /// Requested amount is below the fixed minimum
    BelowMinimum {
        /// Amount the affiliate asked for
        amount_cents: i64,
        /// Smallest allowed request
        minimum_cents: i64,
    },
    /// Requested amount exceeds the available balance
    InsufficientBalance {
        /// Amount the affiliate asked for
        amount_cents: i64,
        /// Balance available at request time
        available_cents: i64,
    },
    /// Requested action is not legal from the current status
    InvalidTransition(String),
    /// Underlying database failure
    Database(DatabaseError),
}

impl std::fmt::Display for PayoutErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutErrorKind::NotFound(id) => write!(f, "Payout request '{}' not found", id),
            PayoutErrorKind::MemberNotFound(id) => write!(f, "Member '{}' not found", id),
            PayoutErrorKind::NotEnabled => {
                write!(f, "Affiliate payouts are not enabled for this account")
            }
            PayoutErrorKind::BelowMinimum {
                amount_cents,
                minimum_cents,
            } => write!(
                f,
                "Minimum payout amount is {} cents, requested {} cents",
                minimum_cents, amount_cents
            ),
            PayoutErrorKind::InsufficientBalance {
                amount_cents,
                available_cents,
            } => write!(
                f,
                "Requested {} cents but only {} cents are available for payout",
                amount_cents, available_cents
            ),
            PayoutErrorKind::InvalidTransition(msg) => write!(f, "{}", msg),
            PayoutErrorKind::Database(err) => write!(f, "{}", err),
        }
    }
}

/// Error type for payout operations.
///
/// # Examples
///
/// ```
/// use upline_error::{PayoutError, PayoutErrorKind};
///
/// let err = PayoutError::new(PayoutErrorKind::NotEnabled);
/// assert!(format!("{}", err).contains("not enabled"));
/// ```
#[derive(Debug, Clone)]
pub struct PayoutError {
    /// The specific error condition
    pub kind: PayoutErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PayoutError {
    /// Create a new PayoutError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PayoutErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for PayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Payout Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for PayoutError {}

impl From<DatabaseError> for PayoutError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        PayoutError::new(PayoutErrorKind::Database(err))
    }
}
