//! Referral graph and affiliate enablement error types.

use crate::DatabaseError;

/// Specific error conditions for referral operations.
#[derive(Debug, Clone)]
pub enum ReferralErrorKind {
    /// Member row does not exist
    MemberNotFound(String),
    /// Could not allocate a unique referral code
    CodeGeneration(String),
    /// Underlying database failure
    Database(DatabaseError),
}

impl std::fmt::Display for ReferralErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferralErrorKind::MemberNotFound(id) => write!(f, "Member '{}' not found", id),
            ReferralErrorKind::CodeGeneration(msg) => {
                write!(f, "Failed to generate referral code: {}", msg)
            }
            ReferralErrorKind::Database(err) => write!(f, "{}", err),
        }
    }
}

/// Error type for referral graph and enablement operations.
///
/// # Examples
///
/// ```
/// use upline_error::{ReferralError, ReferralErrorKind};
///
/// let err = ReferralError::new(ReferralErrorKind::MemberNotFound("m-1".into()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone)]
pub struct ReferralError {
    /// The specific error condition
    pub kind: ReferralErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ReferralError {
    /// Create a new ReferralError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ReferralErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ReferralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Referral Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ReferralError {}

impl From<DatabaseError> for ReferralError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        ReferralError::new(ReferralErrorKind::Database(err))
    }
}
