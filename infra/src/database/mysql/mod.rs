//! MySQL entity stores
//!
//! Stores translate the core filters into WHERE clauses with the same
//! meaning as the in-memory `matches` implementations, and map driver
//! errors onto the repository error taxonomy.

pub mod session_store;
pub mod user_store;

pub use session_store::MySqlSessionStore;
pub use user_store::MySqlUserStore;

use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use ambry_core::errors::{DomainError, RepositoryError};

/// The database server's clock, used to stamp soft deletions
pub(crate) async fn db_now(pool: &MySqlPool) -> Result<DateTime<Utc>, DomainError> {
    let row = sqlx::query("SELECT UTC_TIMESTAMP(6) AS now")
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;
    col(&row, "now")
}

/// Pull the offending column out of a MySQL constraint message,
/// e.g. `Duplicate entry 'x' for key 'users.username'`.
fn constraint_field(message: &str) -> String {
    message
        .rsplit('\'')
        .nth(1)
        .map(|key| key.rsplit('.').next().unwrap_or(key).to_string())
        .unwrap_or_else(|| String::from("value"))
}

/// Map a driver error onto the repository taxonomy
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    let repo_err = match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation => RepositoryError::Unique {
                field: constraint_field(db.message()),
            },
            ErrorKind::NotNullViolation => RepositoryError::NotNull {
                field: constraint_field(db.message()),
            },
            ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation => {
                RepositoryError::Integrity {
                    message: db.message().to_string(),
                }
            }
            _ => RepositoryError::Unknown {
                message: db.message().to_string(),
            },
        },
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepositoryError::Connection {
            message: err.to_string(),
        },
        _ => RepositoryError::Unknown {
            message: err.to_string(),
        },
    };
    DomainError::Repository(repo_err)
}

/// Decode one column, reporting the column name on failure
pub(crate) fn col<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name).map_err(|e| {
        DomainError::Repository(RepositoryError::Unknown {
            message: format!("failed to decode column `{name}`: {e}"),
        })
    })
}

/// Parse a CHAR(36) column into a Uuid
pub(crate) fn parse_uuid(value: &str, name: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(value).map_err(|e| {
        DomainError::Repository(RepositoryError::Integrity {
            message: format!("column `{name}` holds an invalid uuid: {e}"),
        })
    })
}
