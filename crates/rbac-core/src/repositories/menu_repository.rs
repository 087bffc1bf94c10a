//! Menu repository trait (port)

use async_trait::async_trait;
use rbac_shared::QueryResult;

use crate::domain::{Menu, MenuQueryOptions, MenuQueryParams, MenuStatus};
use crate::error::DomainError;

/// Storage for menu rows. Rows come back without actions attached.
#[cfg_attr(test, mockall::automock(type Conn = ();))]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    type Conn: Send;

    async fn query(
        &self,
        conn: &mut Self::Conn,
        params: &MenuQueryParams,
        opts: &MenuQueryOptions,
    ) -> Result<QueryResult<Menu>, DomainError>;
    async fn get(&self, conn: &mut Self::Conn, id: u64) -> Result<Option<Menu>, DomainError>;
    async fn create(&self, conn: &mut Self::Conn, menu: &Menu) -> Result<(), DomainError>;
    async fn update(&self, conn: &mut Self::Conn, id: u64, menu: &Menu) -> Result<(), DomainError>;
    async fn delete(&self, conn: &mut Self::Conn, id: u64) -> Result<(), DomainError>;
    async fn update_parent_path(
        &self,
        conn: &mut Self::Conn,
        id: u64,
        parent_path: &str,
    ) -> Result<(), DomainError>;
    async fn update_status(
        &self,
        conn: &mut Self::Conn,
        id: u64,
        status: MenuStatus,
    ) -> Result<(), DomainError>;
}
