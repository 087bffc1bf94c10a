//! In-memory menu action resource repository

use std::collections::HashSet;

use async_trait::async_trait;

use rbac_core::domain::{MenuActionResource, MenuActionResourceQueryParams};
use rbac_core::error::DomainError;
use rbac_core::repositories::MenuActionResourceRepository;
use rbac_shared::QueryResult;

use super::{duplicate_key, paginate, MemorySession, MemoryTables};

#[derive(Default)]
pub struct MemoryMenuActionResourceRepository;

impl MemoryMenuActionResourceRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Ids of the actions owned by any menu accepted by `keep`
fn action_ids(tables: &MemoryTables, keep: impl Fn(u64) -> bool) -> HashSet<u64> {
    tables
        .actions
        .values()
        .filter(|a| keep(a.menu_id))
        .map(|a| a.id)
        .collect()
}

#[async_trait]
impl MenuActionResourceRepository for MemoryMenuActionResourceRepository {
    type Conn = MemorySession;

    async fn query(
        &self,
        conn: &mut MemorySession,
        params: &MenuActionResourceQueryParams,
    ) -> Result<QueryResult<MenuActionResource>, DomainError> {
        let rows: Vec<MenuActionResource> = conn.read(|t| {
            let by_menu = params.menu_id.map(|id| action_ids(t, |menu_id| menu_id == id));
            let by_menus = (!params.menu_ids.is_empty())
                .then(|| action_ids(t, |menu_id| params.menu_ids.contains(&menu_id)));

            t.resources
                .values()
                .filter(|r| by_menu.as_ref().map_or(true, |ids| ids.contains(&r.action_id)))
                .filter(|r| by_menus.as_ref().map_or(true, |ids| ids.contains(&r.action_id)))
                .cloned()
                .collect()
        });
        Ok(paginate(rows, &params.pagination))
    }

    async fn get(&self, conn: &mut MemorySession, id: u64) -> Result<Option<MenuActionResource>, DomainError> {
        Ok(conn.read(|t| t.resources.get(&id).cloned()))
    }

    async fn create(&self, conn: &mut MemorySession, resource: &MenuActionResource) -> Result<(), DomainError> {
        conn.write(|t| {
            if t.resources.contains_key(&resource.id) {
                return Err(duplicate_key("menu_action_resources", resource.id));
            }
            t.resources.insert(resource.id, resource.clone());
            Ok(())
        })
    }

    async fn update(
        &self,
        conn: &mut MemorySession,
        id: u64,
        resource: &MenuActionResource,
    ) -> Result<(), DomainError> {
        conn.write(|t| {
            if let Some(row) = t.resources.get_mut(&id) {
                row.method = resource.method.clone();
                row.path = resource.path.clone();
            }
        });
        Ok(())
    }

    async fn delete(&self, conn: &mut MemorySession, id: u64) -> Result<(), DomainError> {
        conn.write(|t| t.resources.remove(&id));
        Ok(())
    }

    async fn delete_by_action_id(&self, conn: &mut MemorySession, action_id: u64) -> Result<(), DomainError> {
        conn.write(|t| t.resources.retain(|_, r| r.action_id != action_id));
        Ok(())
    }

    async fn delete_by_menu_id(&self, conn: &mut MemorySession, menu_id: u64) -> Result<(), DomainError> {
        conn.write(|t| {
            let owned = action_ids(t, |id| id == menu_id);
            t.resources.retain(|_, r| !owned.contains(&r.action_id));
        });
        Ok(())
    }
}
