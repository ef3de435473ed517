use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] sked_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] sked_core::error::CoreError),

    #[error("Recurrence error: {0}")]
    RecurrenceError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl From<sked_core::error::ValidationError> for ServiceError {
    fn from(err: sked_core::error::ValidationError) -> Self {
        Self::CoreError(err.into())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
