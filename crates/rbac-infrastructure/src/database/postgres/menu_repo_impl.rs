// ============================================================================
// RBAC Infrastructure - PostgreSQL Menu Repository
// File: crates/rbac-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::info;

use rbac_core::domain::{Menu, MenuQueryOptions, MenuQueryParams, MenuStatus, ShowStatus};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuRepository;
use rbac_shared::QueryResult;

use super::query_util::{db_error, db_ids, escape_like, fetch_page, order_by};
use super::session::PgSession;

const MENU_COLUMNS: &str = "id, name, sequence, icon, router, parent_id, parent_path, \
                            is_show, status, memo, creator, created_at, updated_at";

#[derive(Default)]
pub struct PgMenuRepository;

impl PgMenuRepository {
    pub fn new() -> Self {
        Self
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: i64,
    pub name: String,
    pub sequence: i32,
    pub icon: String,
    pub router: String,
    pub parent_id: i64,
    pub parent_path: String,
    pub is_show: i16,
    pub status: i16,
    pub memo: String,
    pub creator: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id as u64,
            name: row.name,
            sequence: row.sequence,
            icon: row.icon,
            router: row.router,
            parent_id: row.parent_id as u64,
            parent_path: row.parent_path,
            is_show: ShowStatus::from_code(row.is_show).unwrap_or_default(),
            status: MenuStatus::from_code(row.status).unwrap_or_default(),
            memo: row.memo,
            creator: row.creator as u64,
            created_at: row.created_at,
            updated_at: row.updated_at,
            actions: Vec::new(),
        }
    }
}

fn menu_column(key: &str) -> Option<&'static str> {
    match key {
        "id" => Some("id"),
        "name" => Some("name"),
        "sequence" => Some("sequence"),
        "parent_id" => Some("parent_id"),
        "parent_path" => Some("parent_path"),
        "status" => Some("status"),
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        _ => None,
    }
}

fn filtered(select: &str, params: &MenuQueryParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM menus WHERE 1 = 1", select));

    if !params.ids.is_empty() {
        qb.push(" AND id = ANY(").push_bind(db_ids(&params.ids)).push(")");
    }
    if let Some(name) = &params.name {
        qb.push(" AND name = ").push_bind(name.clone());
    }
    if let Some(value) = &params.query_value {
        qb.push(" AND name LIKE ")
            .push_bind(format!("%{}%", escape_like(value)));
    }
    if let Some(parent_id) = params.parent_id {
        qb.push(" AND parent_id = ").push_bind(parent_id as i64);
    }
    if let Some(prefix) = &params.prefix_parent_path {
        // the path itself or anything below it, matched per segment
        qb.push(" AND (parent_path = ")
            .push_bind(prefix.clone())
            .push(" OR parent_path LIKE ")
            .push_bind(format!("{}/%", escape_like(prefix)))
            .push(")");
    }
    if let Some(status) = params.status {
        qb.push(" AND status = ").push_bind(status.code());
    }
    if let Some(is_show) = params.is_show {
        qb.push(" AND is_show = ").push_bind(is_show.code());
    }

    qb
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    type Conn = PgSession;

    async fn query(
        &self,
        conn: &mut PgSession,
        params: &MenuQueryParams,
        opts: &MenuQueryOptions,
    ) -> Result<QueryResult<Menu>, DomainError> {
        let order = order_by(&opts.order_fields, menu_column);
        fetch_page::<MenuRow, Menu, _>(
            conn.conn(),
            &params.pagination,
            MENU_COLUMNS,
            &order,
            |select| filtered(select, params),
            "querying menus",
        )
        .await
    }

    async fn get(&self, conn: &mut PgSession, id: u64) -> Result<Option<Menu>, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, sequence, icon, router, parent_id, parent_path,
                is_show, status, memo, creator, created_at, updated_at
            FROM menus
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(conn.conn())
        .await
        .map_err(db_error("finding menu by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, conn: &mut PgSession, menu: &Menu) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO menus (
                id, name, sequence, icon, router, parent_id, parent_path,
                is_show, status, memo, creator, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(menu.id as i64)
        .bind(&menu.name)
        .bind(menu.sequence)
        .bind(&menu.icon)
        .bind(&menu.router)
        .bind(menu.parent_id as i64)
        .bind(&menu.parent_path)
        .bind(menu.is_show.code())
        .bind(menu.status.code())
        .bind(&menu.memo)
        .bind(menu.creator as i64)
        .bind(menu.created_at)
        .bind(menu.updated_at)
        .execute(conn.conn())
        .await
        .map_err(db_error("creating menu"))?;

        info!("Menu row inserted: {}", menu.id);
        Ok(())
    }

    async fn update(&self, conn: &mut PgSession, id: u64, menu: &Menu) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE menus SET
                name = $2, sequence = $3, icon = $4, router = $5,
                parent_id = $6, parent_path = $7, is_show = $8, status = $9,
                memo = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .bind(&menu.name)
        .bind(menu.sequence)
        .bind(&menu.icon)
        .bind(&menu.router)
        .bind(menu.parent_id as i64)
        .bind(&menu.parent_path)
        .bind(menu.is_show.code())
        .bind(menu.status.code())
        .bind(&menu.memo)
        .bind(menu.updated_at)
        .execute(conn.conn())
        .await
        .map_err(db_error("updating menu"))?;

        Ok(())
    }

    async fn delete(&self, conn: &mut PgSession, id: u64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id as i64)
            .execute(conn.conn())
            .await
            .map_err(db_error("deleting menu"))?;

        Ok(())
    }

    async fn update_parent_path(&self, conn: &mut PgSession, id: u64, parent_path: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE menus SET parent_path = $2, updated_at = NOW() WHERE id = $1")
            .bind(id as i64)
            .bind(parent_path)
            .execute(conn.conn())
            .await
            .map_err(db_error("updating menu parent path"))?;

        Ok(())
    }

    async fn update_status(&self, conn: &mut PgSession, id: u64, status: MenuStatus) -> Result<(), DomainError> {
        sqlx::query("UPDATE menus SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id as i64)
            .bind(status.code())
            .execute(conn.conn())
            .await
            .map_err(db_error("updating menu status"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_render_in_order() {
        let params = MenuQueryParams {
            ids: vec![1, 2],
            parent_id: Some(0),
            prefix_parent_path: Some("1/2".into()),
            status: Some(MenuStatus::Enabled),
            ..Default::default()
        };
        let qb = filtered("COUNT(*)", &params);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM menus WHERE 1 = 1 AND id = ANY($1) AND parent_id = $2 \
             AND (parent_path = $3 OR parent_path LIKE $4) AND status = $5"
        );
    }

    #[test]
    fn test_unfiltered_query() {
        let qb = filtered(MENU_COLUMNS, &MenuQueryParams::default());
        assert!(qb.sql().ends_with("FROM menus WHERE 1 = 1"));
    }
}
