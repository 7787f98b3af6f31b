use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, DbConn, DbErr, EntityTrait, SqlErr, TransactionError, TransactionTrait};

use writeit_core::error::RepoError;

/// Generic PostgreSQL persistence service over one SeaORM entity.
///
/// Holds a handle to the shared pool; cloning the handle is cheap.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Hand back the connection, e.g. to inspect a mock's statement log.
    #[cfg(test)]
    pub(crate) fn into_db(self) -> DbConn {
        self.db
    }

    /// Run `op` inside a transaction on the pool.
    ///
    /// Commits when `op` returns `Ok`, rolls back on `Err`. A transaction
    /// dropped mid-flight also rolls back. Failing to begin or commit is a
    /// connection error.
    pub(crate) async fn in_transaction<F, T>(&self, op: F) -> Result<T, RepoError>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, RepoError>> + Send + 'c>>
            + Send,
        T: Send,
    {
        self.db
            .transaction::<F, T, RepoError>(op)
            .await
            .map_err(|e| match e {
                TransactionError::Connection(err) => {
                    tracing::error!(error = %err, "Transaction could not begin or commit");
                    RepoError::Connection(err.to_string())
                }
                TransactionError::Transaction(err) => {
                    tracing::debug!(error = %err, "Transaction rolled back");
                    err
                }
            })
    }
}

/// Map a failed read into a store error.
pub(crate) fn query_error(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        _ => RepoError::Query(err.to_string()),
    }
}

fn duplicate(err: &DbErr) -> Option<RepoError> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(RepoError::Duplicate(detail)),
        _ => None,
    }
}

/// Map a failed insert. Unique violations are reported as duplicates.
pub(crate) fn insert_error(err: DbErr) -> RepoError {
    duplicate(&err).unwrap_or_else(|| RepoError::NotInserted(err.to_string()))
}

/// Map a failed update. Unique violations are reported as duplicates.
pub(crate) fn update_error(err: DbErr) -> RepoError {
    duplicate(&err).unwrap_or_else(|| RepoError::UpdateFailed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn test_write_errors_keep_their_stage() {
        let err = || DbErr::Exec(RuntimeErr::Internal("disk full".to_owned()));

        assert!(matches!(insert_error(err()), RepoError::NotInserted(_)));
        assert!(matches!(update_error(err()), RepoError::UpdateFailed(_)));
    }

    #[test]
    fn test_connection_errors_are_not_query_errors() {
        let err = query_error(DbErr::Conn(RuntimeErr::Internal("refused".to_owned())));
        assert!(matches!(err, RepoError::Connection(_)));

        let err = query_error(DbErr::RecordNotFound("posts".to_owned()));
        assert!(matches!(err, RepoError::Query(_)));
    }
}
