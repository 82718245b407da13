use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    #[error("{entity} with id={id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("database error: {0}")]
    Database(#[from] DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Coarse classification used by callers that translate errors (HTTP status, exit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    Internal,
}

impl Error {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Error::NotFound { entity, id }
    }

    pub fn conflict<D: std::fmt::Display>(d: D) -> Self {
        Error::Conflict(d.to_string())
    }

    pub fn invalid<D: std::fmt::Display>(d: D) -> Self {
        Error::InvalidArgument(d.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Database(_) | Error::Pool(_) | Error::Migration(_) | Error::Join(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Rewrites constraint violations reported by SQLite into domain errors.
    pub(crate) fn from_constraint(e: DieselError, what: impl FnOnce() -> String) -> Self {
        match e {
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                _,
            ) => Error::Conflict(what()),
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                Error::InvalidArgument(info.message().to_string())
            }
            other => Error::Database(other),
        }
    }
}
