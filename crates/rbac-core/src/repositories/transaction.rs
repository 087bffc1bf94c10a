//! Transaction manager trait (port)
//!
//! Every store call takes an explicit session (`Conn`). A session is either a
//! running transaction opened with [`TransactionManager::begin`] or a detached
//! one from [`TransactionManager::detached`] that autocommits each statement
//! and only sees committed data. Nested steps of one operation share a
//! transaction by receiving the same `&mut Conn`.

use async_trait::async_trait;
use tracing::error;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock(type Conn = ();))]
#[async_trait]
pub trait TransactionManager: Send + Sync {
    type Conn: Send;

    async fn begin(&self) -> Result<Self::Conn, DomainError>;
    async fn detached(&self) -> Result<Self::Conn, DomainError>;
    async fn commit(&self, conn: Self::Conn) -> Result<(), DomainError>;
    async fn rollback(&self, conn: Self::Conn) -> Result<(), DomainError>;
}

/// Commit `conn` when `result` is `Ok`, roll it back otherwise.
///
/// A failed rollback is logged; the caller still gets the original error.
pub async fn complete<M, T>(
    manager: &M,
    conn: M::Conn,
    result: Result<T, DomainError>,
) -> Result<T, DomainError>
where
    M: TransactionManager + ?Sized,
{
    match result {
        Ok(value) => {
            manager.commit(conn).await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = manager.rollback(conn).await {
                error!("Rollback failed after '{}': {}", e, rollback_err);
            }
            Err(e)
        }
    }
}
