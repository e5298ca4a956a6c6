//! Affiliate event recording error types.

use crate::DatabaseError;

/// Specific error conditions for event recording.
#[derive(Debug, Clone, derive_more::Display)]
pub enum EventErrorKind {
    /// Buyer profile does not exist
    #[display("Buyer '{}' not found", _0)]
    BuyerNotFound(String),
    /// Event amount must be a positive number of minor units
    #[display("Event amount must be positive, got {} cents", _0)]
    InvalidAmount(i64),
    /// Underlying database failure
    #[display("{}", _0)]
    Database(DatabaseError),
}

/// Error type for affiliate event recording.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Event Error: {} at line {} in {}", kind, line, file)]
pub struct EventError {
    /// The specific error condition
    pub kind: EventErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl EventError {
    /// Create a new EventError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EventErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<DatabaseError> for EventError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        EventError::new(EventErrorKind::Database(err))
    }
}
