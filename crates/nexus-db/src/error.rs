//! # Store Errors
//!
//! Every repository call returns [`DbResult`]. Failures are sorted into a
//! handful of kinds the services can act on.
//!
//! ```text
//!  sqlx::Error ─────────┬── RowNotFound ────────────► NotFound
//!                       ├── Database, kind() known ─► Constraint { kind }
//!                       ├── Pool closed / timed out ► Connection
//!                       └── anything else ──────────► Query
//!
//!  MigrateError ─────────────────────────────────────► Migration
//! ```
//!
//! Services wrap these in `LedgerError::Db`. Reads there become a zero
//! result plus a notice; writes reach the caller.

use std::fmt;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Which table constraint refused a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A second company row for the same user.
    Unique,
    /// Client or invoice id that doesn't exist.
    ForeignKey,
    /// Negative money or an unknown status string.
    Check,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Check => "check",
            ConstraintKind::NotNull => "not null",
        })
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    /// Missing, soft-deleted when a live row was wanted, or owned by someone
    /// else. The three are indistinguishable to the caller.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: String, id: String },

    #[error("{kind} constraint rejected the write ({detail})")]
    Constraint { kind: ConstraintKind, detail: String },

    /// Opening the pool, or a pool that is closed or starved.
    #[error("cannot reach the database: {0}")]
    Connection(String),

    #[error("schema migration did not apply: {0}")]
    Migration(String),

    /// Begin or commit of a multi-row write.
    #[error("transaction aborted: {0}")]
    Transaction(String),

    #[error("query error: {0}")]
    Query(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// The constraint that refused the write, if that is what happened.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            DbError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => {
                let kind = match db_err.kind() {
                    ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                    ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                    ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                    ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                    _ => None,
                };
                let detail = db_err.message().to_string();
                match kind {
                    Some(kind) => DbError::Constraint { kind, detail },
                    None => DbError::Query(detail),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::Connection("no free connection".to_string()),
            sqlx::Error::PoolClosed => DbError::Connection("pool closed".to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_pool_and_row_errors() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(err.constraint_kind(), None);

        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "cannot reach the database: no free connection");

        let err = DbError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, DbError::Connection(_)));

        let err = DbError::from(sqlx::Error::ColumnNotFound("total_cents".to_string()));
        assert!(matches!(err, DbError::Query(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            DbError::not_found("Invoice", "inv-9").to_string(),
            "Invoice inv-9 does not exist"
        );

        let err = DbError::Constraint {
            kind: ConstraintKind::ForeignKey,
            detail: "FOREIGN KEY constraint failed".to_string(),
        };
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
        assert_eq!(
            err.to_string(),
            "foreign key constraint rejected the write (FOREIGN KEY constraint failed)"
        );
    }
}
