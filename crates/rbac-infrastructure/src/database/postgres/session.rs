// ============================================================================
// RBAC Infrastructure - PostgreSQL Sessions
// File: crates/rbac-infrastructure/src/database/postgres/session.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error};

use rbac_core::error::DomainError;
use rbac_core::repositories::TransactionManager;

/// Connection handed to the Postgres repositories.
pub enum PgSession {
    /// Pooled connection in autocommit mode
    Detached(PoolConnection<Postgres>),
    Transaction(Transaction<'static, Postgres>),
}

impl PgSession {
    pub fn conn(&mut self) -> &mut PgConnection {
        match self {
            PgSession::Detached(conn) => &mut **conn,
            PgSession::Transaction(tx) => &mut **tx,
        }
    }
}

pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    type Conn = PgSession;

    async fn begin(&self) -> Result<PgSession, DomainError> {
        let tx = self.pool.begin().await.map_err(|e: sqlx::Error| {
            error!("Database error beginning transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;
        debug!("Transaction started");
        Ok(PgSession::Transaction(tx))
    }

    async fn detached(&self) -> Result<PgSession, DomainError> {
        let conn = self.pool.acquire().await.map_err(|e: sqlx::Error| {
            error!("Database error acquiring connection: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(PgSession::Detached(conn))
    }

    async fn commit(&self, conn: PgSession) -> Result<(), DomainError> {
        match conn {
            PgSession::Transaction(tx) => tx.commit().await.map_err(|e: sqlx::Error| {
                error!("Database error committing transaction: {}", e);
                DomainError::DatabaseError(e.to_string())
            }),
            PgSession::Detached(_) => Ok(()),
        }
    }

    async fn rollback(&self, conn: PgSession) -> Result<(), DomainError> {
        match conn {
            PgSession::Transaction(tx) => {
                debug!("Rolling back transaction");
                tx.rollback().await.map_err(|e: sqlx::Error| {
                    error!("Database error rolling back transaction: {}", e);
                    DomainError::DatabaseError(e.to_string())
                })
            }
            PgSession::Detached(_) => Ok(()),
        }
    }
}
