//! In-memory menu action repository

use async_trait::async_trait;

use rbac_core::domain::{MenuAction, MenuActionQueryParams};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuActionRepository;
use rbac_shared::QueryResult;

use super::{duplicate_key, paginate, MemorySession};

#[derive(Default)]
pub struct MemoryMenuActionRepository;

impl MemoryMenuActionRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MenuActionRepository for MemoryMenuActionRepository {
    type Conn = MemorySession;

    async fn query(
        &self,
        conn: &mut MemorySession,
        params: &MenuActionQueryParams,
    ) -> Result<QueryResult<MenuAction>, DomainError> {
        let rows: Vec<MenuAction> = conn.read(|t| {
            t.actions
                .values()
                .filter(|a| params.menu_id.map_or(true, |id| a.menu_id == id))
                .filter(|a| params.ids.is_empty() || params.ids.contains(&a.id))
                .cloned()
                .collect()
        });
        Ok(paginate(rows, &params.pagination))
    }

    async fn get(&self, conn: &mut MemorySession, id: u64) -> Result<Option<MenuAction>, DomainError> {
        Ok(conn.read(|t| t.actions.get(&id).cloned()))
    }

    async fn create(&self, conn: &mut MemorySession, action: &MenuAction) -> Result<(), DomainError> {
        conn.write(|t| {
            if t.actions.contains_key(&action.id) {
                return Err(duplicate_key("menu_actions", action.id));
            }
            let mut row = action.clone();
            row.resources.clear();
            t.actions.insert(row.id, row);
            Ok(())
        })
    }

    async fn update(&self, conn: &mut MemorySession, id: u64, action: &MenuAction) -> Result<(), DomainError> {
        conn.write(|t| {
            if let Some(row) = t.actions.get_mut(&id) {
                row.code = action.code.clone();
                row.name = action.name.clone();
            }
        });
        Ok(())
    }

    async fn delete(&self, conn: &mut MemorySession, id: u64) -> Result<(), DomainError> {
        conn.write(|t| t.actions.remove(&id));
        Ok(())
    }

    async fn delete_by_menu_id(&self, conn: &mut MemorySession, menu_id: u64) -> Result<(), DomainError> {
        conn.write(|t| t.actions.retain(|_, a| a.menu_id != menu_id));
        Ok(())
    }
}
