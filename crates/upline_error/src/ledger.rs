//! Commission ledger state machine error types.

use crate::DatabaseError;

/// Specific error conditions for ledger transitions.
#[derive(Debug, Clone)]
pub enum LedgerErrorKind {
    /// Batch action invoked with no entry ids
    EmptySelection,
    /// One or more selected entries do not exist
    EntriesNotFound(Vec<String>),
    /// Selected entries do not share a single current status
    MixedBatch,
    /// Requested action is not legal from the current status
    InvalidTransition(String),
    /// Underlying database failure
    Database(DatabaseError),
}

impl std::fmt::Display for LedgerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerErrorKind::EmptySelection => {
                write!(f, "No ledger entries selected for this action")
            }
            LedgerErrorKind::EntriesNotFound(ids) => {
                write!(f, "Ledger entries not found: {}", ids.join(", "))
            }
            LedgerErrorKind::MixedBatch => write!(
                f,
                "Batch actions require all selected entries to share the same status"
            ),
            LedgerErrorKind::InvalidTransition(msg) => write!(f, "{}", msg),
            LedgerErrorKind::Database(err) => write!(f, "{}", err),
        }
    }
}

/// Error type for commission ledger operations.
///
/// # Examples
///
/// ```
/// use upline_error::{LedgerError, LedgerErrorKind};
///
/// let err = LedgerError::new(LedgerErrorKind::MixedBatch);
/// assert!(format!("{}", err).contains("same status"));
/// ```
#[derive(Debug, Clone)]
pub struct LedgerError {
    /// The specific error condition
    pub kind: LedgerErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new LedgerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ledger Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for LedgerError {}

impl From<DatabaseError> for LedgerError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        LedgerError::new(LedgerErrorKind::Database(err))
    }
}
