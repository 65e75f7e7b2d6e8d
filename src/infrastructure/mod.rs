pub mod attendance_repository;
#[cfg(test)]
pub mod memory;
pub mod user_repository;

pub use attendance_repository::MySqlAttendanceRepository;
pub use user_repository::MySqlUserRepository;

use crate::domain::RepositoryError;

/// SQLSTATE MySQL reports for duplicate keys and foreign key failures.
const INTEGRITY_CONSTRAINT_VIOLATION: &str = "23000";

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(INTEGRITY_CONSTRAINT_VIOLATION) =>
            {
                RepositoryError::Constraint(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => RepositoryError::Connection(e.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                RepositoryError::Corrupt(e.to_string())
            }
            _ => RepositoryError::Query(e.to_string()),
        }
    }
}
