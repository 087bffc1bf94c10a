//! Menu action resource repository trait (port)

use async_trait::async_trait;
use rbac_shared::QueryResult;

use crate::domain::{MenuActionResource, MenuActionResourceQueryParams};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock(type Conn = ();))]
#[async_trait]
pub trait MenuActionResourceRepository: Send + Sync {
    type Conn: Send;

    /// Menu filters select through the owning actions' menu ids.
    async fn query(
        &self,
        conn: &mut Self::Conn,
        params: &MenuActionResourceQueryParams,
    ) -> Result<QueryResult<MenuActionResource>, DomainError>;
    async fn get(&self, conn: &mut Self::Conn, id: u64) -> Result<Option<MenuActionResource>, DomainError>;
    async fn create(&self, conn: &mut Self::Conn, resource: &MenuActionResource) -> Result<(), DomainError>;
    async fn update(
        &self,
        conn: &mut Self::Conn,
        id: u64,
        resource: &MenuActionResource,
    ) -> Result<(), DomainError>;
    async fn delete(&self, conn: &mut Self::Conn, id: u64) -> Result<(), DomainError>;
    async fn delete_by_action_id(&self, conn: &mut Self::Conn, action_id: u64) -> Result<(), DomainError>;
    async fn delete_by_menu_id(&self, conn: &mut Self::Conn, menu_id: u64) -> Result<(), DomainError>;
}
