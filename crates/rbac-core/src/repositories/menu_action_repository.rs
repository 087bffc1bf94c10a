//! Menu action repository trait (port)

use async_trait::async_trait;
use rbac_shared::QueryResult;

use crate::domain::{MenuAction, MenuActionQueryParams};
use crate::error::DomainError;

/// Storage for menu actions. Rows come back without resources attached.
#[cfg_attr(test, mockall::automock(type Conn = ();))]
#[async_trait]
pub trait MenuActionRepository: Send + Sync {
    type Conn: Send;

    async fn query(
        &self,
        conn: &mut Self::Conn,
        params: &MenuActionQueryParams,
    ) -> Result<QueryResult<MenuAction>, DomainError>;
    async fn get(&self, conn: &mut Self::Conn, id: u64) -> Result<Option<MenuAction>, DomainError>;
    async fn create(&self, conn: &mut Self::Conn, action: &MenuAction) -> Result<(), DomainError>;
    async fn update(&self, conn: &mut Self::Conn, id: u64, action: &MenuAction) -> Result<(), DomainError>;
    async fn delete(&self, conn: &mut Self::Conn, id: u64) -> Result<(), DomainError>;
    async fn delete_by_menu_id(&self, conn: &mut Self::Conn, menu_id: u64) -> Result<(), DomainError>;
}
