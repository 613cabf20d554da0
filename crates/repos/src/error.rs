use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("database failure: {0}")]
    DatabaseError(String),

    #[error("not found")]
    NotFound(),

    #[error("uniqueness violation on {0} ({1})")]
    UniqueViolation(String, String),

    #[error("foreign key violation on {0} ({1})")]
    ForeignKeyViolation(String, String),

    #[error("check violation on {0} ({1})")]
    CheckViolation(String, String),

    #[error("database transaction error")]
    TransactionError(),

    #[error("database error")]
    Other(),
}

/// Maps a failed write onto the constraint that rejected it, when there is one.
pub fn handle_sql_error(err: sqlx::Error) -> RepoError {
    use sqlx::Error as E;

    error!(error = %err, "SQL error");
    match err {
        E::RowNotFound => RepoError::NotFound(),
        E::Database(ref e) => {
            let constraint = e.constraint().unwrap_or_default().to_string();
            let table = e.table().unwrap_or_default().to_string();

            if e.is_unique_violation() {
                RepoError::UniqueViolation(table, constraint)
            } else if e.is_foreign_key_violation() {
                RepoError::ForeignKeyViolation(table, constraint)
            } else if e.is_check_violation() {
                RepoError::CheckViolation(table, constraint)
            } else {
                RepoError::DatabaseError(e.message().to_string())
            }
        }
        E::PoolClosed | E::PoolTimedOut => RepoError::TransactionError(),
        _ => RepoError::Other(),
    }
}
