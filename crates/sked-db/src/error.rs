use std::path::PathBuf;

use thiserror::Error;

/// Storage layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    CoreError(#[from] sked_core::error::CoreError),
}

impl DbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
