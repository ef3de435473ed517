use thiserror::Error;

/// Application-level errors (bootstrap)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] sked_service::error::ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] sked_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] sked_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
