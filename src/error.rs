use thiserror::Error;

/// Errors raised by the item store, the reorder engine and the session.
///
/// `NotFound`, `NoDestination` and `InconsistentState` are validation failures:
/// the operation is abandoned before anything is written.
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("item {0} not found")]
    NotFound(i64),

    #[error("no destination: {0}")]
    NoDestination(String),

    #[error("inconsistent hierarchy: {0}")]
    InconsistentState(String),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type GoalResult<T> = Result<T, GoalError>;

impl GoalError {
    /// True for the data-driven failures that leave the store untouched.
    pub fn is_declined(&self) -> bool {
        !matches!(self, GoalError::Storage(_))
    }
}
