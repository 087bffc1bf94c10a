// ============================================================================
// RBAC Infrastructure - PostgreSQL Menu Action Resource Repository
// File: crates/rbac-infrastructure/src/database/postgres/menu_action_resource_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};

use rbac_core::domain::{MenuActionResource, MenuActionResourceQueryParams};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuActionResourceRepository;
use rbac_shared::QueryResult;

use super::query_util::{db_error, db_ids, fetch_page};
use super::session::PgSession;

#[derive(Default)]
pub struct PgMenuActionResourceRepository;

impl PgMenuActionResourceRepository {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, FromRow)]
struct MenuActionResourceRow {
    pub id: i64,
    pub action_id: i64,
    pub method: String,
    pub path: String,
}

impl From<MenuActionResourceRow> for MenuActionResource {
    fn from(row: MenuActionResourceRow) -> Self {
        MenuActionResource {
            id: row.id as u64,
            action_id: row.action_id as u64,
            method: row.method,
            path: row.path,
        }
    }
}

fn filtered(select: &str, params: &MenuActionResourceQueryParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM menu_action_resources WHERE 1 = 1",
        select
    ));

    if let Some(menu_id) = params.menu_id {
        qb.push(" AND action_id IN (SELECT id FROM menu_actions WHERE menu_id = ")
            .push_bind(menu_id as i64)
            .push(")");
    }
    if !params.menu_ids.is_empty() {
        qb.push(" AND action_id IN (SELECT id FROM menu_actions WHERE menu_id = ANY(")
            .push_bind(db_ids(&params.menu_ids))
            .push("))");
    }

    qb
}

#[async_trait]
impl MenuActionResourceRepository for PgMenuActionResourceRepository {
    type Conn = PgSession;

    async fn query(
        &self,
        conn: &mut PgSession,
        params: &MenuActionResourceQueryParams,
    ) -> Result<QueryResult<MenuActionResource>, DomainError> {
        fetch_page::<MenuActionResourceRow, MenuActionResource, _>(
            conn.conn(),
            &params.pagination,
            "id, action_id, method, path",
            " ORDER BY id ASC",
            |select| filtered(select, params),
            "querying menu action resources",
        )
        .await
    }

    async fn get(&self, conn: &mut PgSession, id: u64) -> Result<Option<MenuActionResource>, DomainError> {
        let row: Option<MenuActionResourceRow> =
            sqlx::query_as("SELECT id, action_id, method, path FROM menu_action_resources WHERE id = $1")
                .bind(id as i64)
                .fetch_optional(conn.conn())
                .await
                .map_err(db_error("finding menu action resource by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, conn: &mut PgSession, resource: &MenuActionResource) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO menu_action_resources (id, action_id, method, path) VALUES ($1, $2, $3, $4)")
            .bind(resource.id as i64)
            .bind(resource.action_id as i64)
            .bind(&resource.method)
            .bind(&resource.path)
            .execute(conn.conn())
            .await
            .map_err(db_error("creating menu action resource"))?;

        Ok(())
    }

    async fn update(
        &self,
        conn: &mut PgSession,
        id: u64,
        resource: &MenuActionResource,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE menu_action_resources SET method = $2, path = $3 WHERE id = $1")
            .bind(id as i64)
            .bind(&resource.method)
            .bind(&resource.path)
            .execute(conn.conn())
            .await
            .map_err(db_error("updating menu action resource"))?;

        Ok(())
    }

    async fn delete(&self, conn: &mut PgSession, id: u64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM menu_action_resources WHERE id = $1")
            .bind(id as i64)
            .execute(conn.conn())
            .await
            .map_err(db_error("deleting menu action resource"))?;

        Ok(())
    }

    async fn delete_by_action_id(&self, conn: &mut PgSession, action_id: u64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM menu_action_resources WHERE action_id = $1")
            .bind(action_id as i64)
            .execute(conn.conn())
            .await
            .map_err(db_error("deleting resources by action"))?;

        Ok(())
    }

    async fn delete_by_menu_id(&self, conn: &mut PgSession, menu_id: u64) -> Result<(), DomainError> {
        sqlx::query(
            "DELETE FROM menu_action_resources \
             WHERE action_id IN (SELECT id FROM menu_actions WHERE menu_id = $1)",
        )
        .bind(menu_id as i64)
        .execute(conn.conn())
        .await
        .map_err(db_error("deleting resources by menu"))?;

        Ok(())
    }
}
