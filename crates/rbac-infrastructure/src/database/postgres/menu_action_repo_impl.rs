// ============================================================================
// RBAC Infrastructure - PostgreSQL Menu Action Repository
// File: crates/rbac-infrastructure/src/database/postgres/menu_action_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};

use rbac_core::domain::{MenuAction, MenuActionQueryParams};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuActionRepository;
use rbac_shared::QueryResult;

use super::query_util::{db_error, db_ids, fetch_page};
use super::session::PgSession;

#[derive(Default)]
pub struct PgMenuActionRepository;

impl PgMenuActionRepository {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, FromRow)]
struct MenuActionRow {
    pub id: i64,
    pub menu_id: i64,
    pub code: String,
    pub name: String,
}

impl From<MenuActionRow> for MenuAction {
    fn from(row: MenuActionRow) -> Self {
        MenuAction {
            id: row.id as u64,
            menu_id: row.menu_id as u64,
            code: row.code,
            name: row.name,
            resources: Vec::new(),
        }
    }
}

fn filtered(select: &str, params: &MenuActionQueryParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM menu_actions WHERE 1 = 1", select));

    if let Some(menu_id) = params.menu_id {
        qb.push(" AND menu_id = ").push_bind(menu_id as i64);
    }
    if !params.ids.is_empty() {
        qb.push(" AND id = ANY(").push_bind(db_ids(&params.ids)).push(")");
    }

    qb
}

#[async_trait]
impl MenuActionRepository for PgMenuActionRepository {
    type Conn = PgSession;

    async fn query(
        &self,
        conn: &mut PgSession,
        params: &MenuActionQueryParams,
    ) -> Result<QueryResult<MenuAction>, DomainError> {
        // ids are time ordered, so this keeps creation order
        fetch_page::<MenuActionRow, MenuAction, _>(
            conn.conn(),
            &params.pagination,
            "id, menu_id, code, name",
            " ORDER BY id ASC",
            |select| filtered(select, params),
            "querying menu actions",
        )
        .await
    }

    async fn get(&self, conn: &mut PgSession, id: u64) -> Result<Option<MenuAction>, DomainError> {
        let row: Option<MenuActionRow> =
            sqlx::query_as("SELECT id, menu_id, code, name FROM menu_actions WHERE id = $1")
                .bind(id as i64)
                .fetch_optional(conn.conn())
                .await
                .map_err(db_error("finding menu action by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, conn: &mut PgSession, action: &MenuAction) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO menu_actions (id, menu_id, code, name) VALUES ($1, $2, $3, $4)")
            .bind(action.id as i64)
            .bind(action.menu_id as i64)
            .bind(&action.code)
            .bind(&action.name)
            .execute(conn.conn())
            .await
            .map_err(db_error("creating menu action"))?;

        Ok(())
    }

    async fn update(&self, conn: &mut PgSession, id: u64, action: &MenuAction) -> Result<(), DomainError> {
        sqlx::query("UPDATE menu_actions SET code = $2, name = $3 WHERE id = $1")
            .bind(id as i64)
            .bind(&action.code)
            .bind(&action.name)
            .execute(conn.conn())
            .await
            .map_err(db_error("updating menu action"))?;

        Ok(())
    }

    async fn delete(&self, conn: &mut PgSession, id: u64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM menu_actions WHERE id = $1")
            .bind(id as i64)
            .execute(conn.conn())
            .await
            .map_err(db_error("deleting menu action"))?;

        Ok(())
    }

    async fn delete_by_menu_id(&self, conn: &mut PgSession, menu_id: u64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM menu_actions WHERE menu_id = $1")
            .bind(menu_id as i64)
            .execute(conn.conn())
            .await
            .map_err(db_error("deleting menu actions by menu"))?;

        Ok(())
    }
}
