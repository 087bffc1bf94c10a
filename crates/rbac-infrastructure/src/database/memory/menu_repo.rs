// ============================================================================
// RBAC Infrastructure - In-Memory Menu Repository
// File: crates/rbac-infrastructure/src/database/memory/menu_repo.rs
// ============================================================================

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;

use rbac_core::domain::menu_path::is_under;
use rbac_core::domain::{Menu, MenuQueryOptions, MenuQueryParams, MenuStatus};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuRepository;
use rbac_shared::{OrderDirection, OrderField, QueryResult};

use super::{duplicate_key, paginate, MemorySession};

#[derive(Default)]
pub struct MemoryMenuRepository;

impl MemoryMenuRepository {
    pub fn new() -> Self {
        Self
    }
}

fn matches(menu: &Menu, params: &MenuQueryParams) -> bool {
    (params.ids.is_empty() || params.ids.contains(&menu.id))
        && params.name.as_ref().map_or(true, |name| &menu.name == name)
        && params
            .query_value
            .as_ref()
            .map_or(true, |value| menu.name.contains(value.as_str()))
        && params.parent_id.map_or(true, |id| menu.parent_id == id)
        && params
            .prefix_parent_path
            .as_ref()
            .map_or(true, |prefix| is_under(&menu.parent_path, prefix))
        && params.status.map_or(true, |status| menu.status == status)
        && params.is_show.map_or(true, |is_show| menu.is_show == is_show)
}

fn compare(a: &Menu, b: &Menu, fields: &[OrderField]) -> Ordering {
    for field in fields {
        let ord = match field.key.as_str() {
            "id" => a.id.cmp(&b.id),
            "name" => a.name.cmp(&b.name),
            "sequence" => a.sequence.cmp(&b.sequence),
            "parent_id" => a.parent_id.cmp(&b.parent_id),
            "parent_path" => a.parent_path.cmp(&b.parent_path),
            "status" => a.status.code().cmp(&b.status.code()),
            "created_at" => a.created_at.cmp(&b.created_at),
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            _ => Ordering::Equal,
        };
        let ord = match field.direction {
            OrderDirection::Asc => ord,
            OrderDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl MenuRepository for MemoryMenuRepository {
    type Conn = MemorySession;

    async fn query(
        &self,
        conn: &mut MemorySession,
        params: &MenuQueryParams,
        opts: &MenuQueryOptions,
    ) -> Result<QueryResult<Menu>, DomainError> {
        let mut rows: Vec<Menu> = conn.read(|t| {
            t.menus
                .values()
                .filter(|menu| matches(menu, params))
                .cloned()
                .collect()
        });
        rows.sort_by(|a, b| compare(a, b, &opts.order_fields));
        Ok(paginate(rows, &params.pagination))
    }

    async fn get(&self, conn: &mut MemorySession, id: u64) -> Result<Option<Menu>, DomainError> {
        Ok(conn.read(|t| t.menus.get(&id).cloned()))
    }

    async fn create(&self, conn: &mut MemorySession, menu: &Menu) -> Result<(), DomainError> {
        conn.write(|t| {
            if t.menus.contains_key(&menu.id) {
                return Err(duplicate_key("menus", menu.id));
            }
            let mut row = menu.clone();
            row.actions.clear();
            t.menus.insert(row.id, row);
            Ok(())
        })
    }

    async fn update(&self, conn: &mut MemorySession, id: u64, menu: &Menu) -> Result<(), DomainError> {
        conn.write(|t| {
            if let Some(row) = t.menus.get_mut(&id) {
                row.name = menu.name.clone();
                row.sequence = menu.sequence;
                row.icon = menu.icon.clone();
                row.router = menu.router.clone();
                row.parent_id = menu.parent_id;
                row.parent_path = menu.parent_path.clone();
                row.is_show = menu.is_show;
                row.status = menu.status;
                row.memo = menu.memo.clone();
                row.updated_at = menu.updated_at;
            }
        });
        Ok(())
    }

    async fn delete(&self, conn: &mut MemorySession, id: u64) -> Result<(), DomainError> {
        conn.write(|t| t.menus.remove(&id));
        Ok(())
    }

    async fn update_parent_path(
        &self,
        conn: &mut MemorySession,
        id: u64,
        parent_path: &str,
    ) -> Result<(), DomainError> {
        conn.write(|t| {
            if let Some(row) = t.menus.get_mut(&id) {
                row.parent_path = parent_path.to_string();
                row.updated_at = Utc::now();
            }
        });
        Ok(())
    }

    async fn update_status(&self, conn: &mut MemorySession, id: u64, status: MenuStatus) -> Result<(), DomainError> {
        conn.write(|t| {
            if let Some(row) = t.menus.get_mut(&id) {
                row.status = status;
                row.updated_at = Utc::now();
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDatabase;
    use rbac_core::repositories::TransactionManager;
    use rbac_shared::PaginationParam;

    fn menu(id: u64, parent_id: u64, parent_path: &str, name: &str, sequence: i32) -> Menu {
        let mut m = Menu::new(name, parent_id, sequence);
        m.id = id;
        m.parent_path = parent_path.to_string();
        m
    }

    async fn seeded() -> (MemoryDatabase, MemorySession) {
        let db = MemoryDatabase::new();
        let mut conn = db.detached().await.unwrap();
        let repo = MemoryMenuRepository::new();
        for m in [
            menu(1, 0, "", "System", 10),
            menu(2, 1, "1", "Menus", 5),
            menu(3, 1, "1", "Roles", 9),
            menu(4, 2, "1/2", "Menu Actions", 0),
            menu(23, 0, "", "Reports", 1),
            menu(24, 23, "23", "Monthly", 0),
        ] {
            repo.create(&mut conn, &m).await.unwrap();
        }
        (db, conn)
    }

    #[tokio::test]
    async fn test_default_order_is_sequence_desc() {
        let (_db, mut conn) = seeded().await;
        let params = MenuQueryParams { parent_id: Some(1), ..Default::default() };
        let result = MemoryMenuRepository
            .query(&mut conn, &params, &MenuQueryOptions::default())
            .await
            .unwrap();

        let names: Vec<_> = result.data.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Roles", "Menus"]);
    }

    #[tokio::test]
    async fn test_prefix_filter_is_segment_aware() {
        let (_db, mut conn) = seeded().await;
        let stray = menu(25, 12, "12", "Shares a digit prefix", 0);
        MemoryMenuRepository.create(&mut conn, &stray).await.unwrap();

        let params = MenuQueryParams {
            prefix_parent_path: Some("1".into()),
            ..Default::default()
        };
        let result = MemoryMenuRepository
            .query(&mut conn, &params, &MenuQueryOptions::default())
            .await
            .unwrap();

        let mut ids: Vec<_> = result.data.iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn test_fuzzy_name_and_paging() {
        let (_db, mut conn) = seeded().await;
        let params = MenuQueryParams {
            pagination: PaginationParam::page(1, 1),
            query_value: Some("en".into()),
            ..Default::default()
        };
        let result = MemoryMenuRepository
            .query(&mut conn, &params, &MenuQueryOptions::default())
            .await
            .unwrap();

        // "Menus" and "Menu Actions"
        assert_eq!(result.total(), 2);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].name, "Menus");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let (_db, mut conn) = seeded().await;
        let result = MemoryMenuRepository.create(&mut conn, &menu(1, 0, "", "Again", 0)).await;
        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
    }
}
