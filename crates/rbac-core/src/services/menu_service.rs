// ============================================================================
// RBAC Core - Menu Service
// File: crates/rbac-core/src/services/menu_service.rs
// ============================================================================
//! Menu hierarchy management: tree ingestion, materialized paths,
//! action/resource reconciliation and cascade-safe deletion.

use std::sync::Arc;

use chrono::Utc;
use rbac_shared::id::IdGenerator;
use rbac_shared::{IdResult, QueryResult};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::menu_path::{is_under, join_parent_path, rebase_path};
use crate::domain::{
    fill_action_resources, fill_menu_actions, group_actions_by_menu, group_resources_by_action, Menu,
    MenuAction, MenuActionQueryParams, MenuActionResourceQueryParams, MenuQueryOptions,
    MenuQueryParams, MenuStatus, MenuTree,
};
use crate::error::DomainError;
use crate::repositories::{
    complete, MenuActionRepository, MenuActionResourceRepository, MenuRepository, TransactionManager,
};
use crate::services::menu_diff::{diff_actions, diff_resources};

/// Menu service over one storage backend. All repositories share the
/// transaction manager's session type.
pub struct MenuService<T, M, A, R>
where
    T: TransactionManager,
    M: MenuRepository<Conn = T::Conn>,
    A: MenuActionRepository<Conn = T::Conn>,
    R: MenuActionResourceRepository<Conn = T::Conn>,
{
    trans: Arc<T>,
    menu_repo: Arc<M>,
    action_repo: Arc<A>,
    resource_repo: Arc<R>,
    ids: Arc<IdGenerator>,
}

impl<T, M, A, R> MenuService<T, M, A, R>
where
    T: TransactionManager,
    M: MenuRepository<Conn = T::Conn>,
    A: MenuActionRepository<Conn = T::Conn>,
    R: MenuActionResourceRepository<Conn = T::Conn>,
{
    pub fn new(
        trans: Arc<T>,
        menu_repo: Arc<M>,
        action_repo: Arc<A>,
        resource_repo: Arc<R>,
        ids: Arc<IdGenerator>,
    ) -> Self {
        Self {
            trans,
            menu_repo,
            action_repo,
            resource_repo,
            ids,
        }
    }

    /// Whether the menu table holds any row
    pub async fn has_menus(&self) -> Result<bool, DomainError> {
        let mut conn = self.trans.detached().await?;
        let result = self
            .menu_repo
            .query(&mut conn, &MenuQueryParams::count_only(), &MenuQueryOptions::default())
            .await?;
        Ok(result.total() > 0)
    }

    /// Create `trees` under `parent_id` when no menu exists yet.
    ///
    /// Nodes are created depth-first in one transaction, parents before their
    /// children; any failure leaves the table untouched. Returns the number of
    /// menus created.
    pub async fn init_from_tree(&self, parent_id: u64, trees: &[MenuTree]) -> Result<usize, DomainError> {
        if self.has_menus().await? {
            info!("Menu table not empty, skipping tree initialization");
            return Ok(0);
        }

        let mut tx = self.trans.begin().await?;
        let result = self.create_trees(&mut tx, parent_id, trees).await;
        let created = complete(self.trans.as_ref(), tx, result).await?;

        info!("Initialized {} menus from tree", created);
        Ok(created)
    }

    async fn create_trees(
        &self,
        conn: &mut T::Conn,
        parent_id: u64,
        trees: &[MenuTree],
    ) -> Result<usize, DomainError> {
        // (parent id, node) pairs; reversed so siblings pop in declaration order
        let mut pending: Vec<(u64, &MenuTree)> = trees.iter().rev().map(|t| (parent_id, t)).collect();
        let mut created = 0;

        while let Some((parent_id, tree)) = pending.pop() {
            let mut menu = tree.to_menu(parent_id);
            menu.validate()?;
            self.prepare_create(conn, &mut menu).await?;
            self.insert_menu(conn, &menu).await?;
            created += 1;

            pending.extend(tree.children.iter().rev().map(|child| (menu.id, child)));
        }

        Ok(created)
    }

    pub async fn query(
        &self,
        params: &MenuQueryParams,
        opts: &MenuQueryOptions,
    ) -> Result<QueryResult<Menu>, DomainError> {
        let mut conn = self.trans.detached().await?;

        let actions = self
            .action_repo
            .query(&mut conn, &MenuActionQueryParams::default())
            .await?;

        let mut result = self.menu_repo.query(&mut conn, params, opts).await?;
        fill_menu_actions(&mut result.data, group_actions_by_menu(actions.data));
        Ok(result)
    }

    pub async fn get(&self, id: u64) -> Result<Menu, DomainError> {
        let mut conn = self.trans.detached().await?;
        self.get_with(&mut conn, id).await
    }

    /// Actions of a menu with their resources attached
    pub async fn query_actions(&self, id: u64) -> Result<Vec<MenuAction>, DomainError> {
        let mut conn = self.trans.detached().await?;
        self.query_actions_with(&mut conn, id).await
    }

    async fn get_with(&self, conn: &mut T::Conn, id: u64) -> Result<Menu, DomainError> {
        let mut menu = self.menu_repo.get(conn, id).await?.ok_or(DomainError::NotFound)?;
        menu.actions = self.query_actions_with(conn, id).await?;
        Ok(menu)
    }

    async fn query_actions_with(&self, conn: &mut T::Conn, id: u64) -> Result<Vec<MenuAction>, DomainError> {
        let mut actions = self
            .action_repo
            .query(conn, &MenuActionQueryParams::by_menu(id))
            .await?
            .data;
        if actions.is_empty() {
            return Ok(actions);
        }

        let resources = self
            .resource_repo
            .query(conn, &MenuActionResourceQueryParams::by_menu(id))
            .await?;
        fill_action_resources(&mut actions, group_resources_by_action(resources.data));
        Ok(actions)
    }

    async fn check_name(&self, conn: &mut T::Conn, menu: &Menu) -> Result<(), DomainError> {
        let params = MenuQueryParams {
            parent_id: Some(menu.parent_id),
            name: Some(menu.name.clone()),
            ..MenuQueryParams::count_only()
        };
        let result = self.menu_repo.query(conn, &params, &MenuQueryOptions::default()).await?;
        if result.total() > 0 {
            warn!("Menu name '{}' already used under parent {}", menu.name, menu.parent_id);
            return Err(DomainError::ValidationError(format!(
                "Menu name already exists under parent {}: {}",
                menu.parent_id, menu.name
            )));
        }
        Ok(())
    }

    async fn parent_path(&self, conn: &mut T::Conn, parent_id: u64) -> Result<String, DomainError> {
        if parent_id == rbac_shared::constants::ROOT_PARENT_ID {
            return Ok(String::new());
        }

        let parent = self
            .menu_repo
            .get(conn, parent_id)
            .await?
            .ok_or(DomainError::InvalidParent)?;
        Ok(join_parent_path(&parent.parent_path, parent.id))
    }

    /// Sibling check, parent path and a fresh id for a menu about to be inserted.
    async fn prepare_create(&self, conn: &mut T::Conn, menu: &mut Menu) -> Result<(), DomainError> {
        self.check_name(conn, menu).await?;
        menu.parent_path = self.parent_path(conn, menu.parent_id).await?;
        menu.id = self.ids.next_id();
        Ok(())
    }

    async fn insert_menu(&self, conn: &mut T::Conn, menu: &Menu) -> Result<(), DomainError> {
        self.create_actions(conn, menu.id, &menu.actions).await?;
        self.menu_repo.create(conn, menu).await
    }

    pub async fn create(&self, mut menu: Menu) -> Result<IdResult, DomainError> {
        menu.name = menu.name.trim().to_string();
        menu.validate()?;

        let mut conn = self.trans.detached().await?;
        self.prepare_create(&mut conn, &mut menu).await?;
        drop(conn);

        let mut tx = self.trans.begin().await?;
        let result = self.insert_menu(&mut tx, &menu).await;
        complete(self.trans.as_ref(), tx, result).await?;

        info!("Menu created: {} ({})", menu.id, menu.name);
        Ok(IdResult::new(menu.id))
    }

    async fn create_actions<'a, I>(&self, conn: &mut T::Conn, menu_id: u64, actions: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = &'a MenuAction>,
    {
        for action in actions {
            let mut action = action.clone();
            action.id = self.ids.next_id();
            action.menu_id = menu_id;
            self.action_repo.create(conn, &action).await?;

            for resource in &action.resources {
                let mut resource = resource.clone();
                resource.id = self.ids.next_id();
                resource.action_id = action.id;
                self.resource_repo.create(conn, &resource).await?;
            }
        }
        Ok(())
    }

    pub async fn update(&self, id: u64, mut menu: Menu) -> Result<(), DomainError> {
        if id == menu.parent_id {
            return Err(DomainError::InvalidParent);
        }
        menu.name = menu.name.trim().to_string();
        menu.validate()?;

        let mut conn = self.trans.detached().await?;
        let old = self.get_with(&mut conn, id).await?;
        if old.name != menu.name {
            self.check_name(&mut conn, &menu).await?;
        }

        menu.id = old.id;
        menu.creator = old.creator;
        menu.created_at = old.created_at;
        menu.updated_at = Utc::now();

        if old.parent_id != menu.parent_id {
            menu.parent_path = self.parent_path(&mut conn, menu.parent_id).await?;
            // the new parent must not sit inside the subtree being moved
            if is_under(&menu.parent_path, &old.full_path()) {
                warn!("Menu {} cannot move below its own descendant {}", id, menu.parent_id);
                return Err(DomainError::InvalidParent);
            }
        } else {
            menu.parent_path = old.parent_path.clone();
        }
        drop(conn);

        let mut tx = self.trans.begin().await?;
        let result = self.apply_update(&mut tx, &old, &menu).await;
        complete(self.trans.as_ref(), tx, result).await?;

        info!("Menu updated: {} ({})", id, menu.name);
        Ok(())
    }

    async fn apply_update(&self, conn: &mut T::Conn, old: &Menu, menu: &Menu) -> Result<(), DomainError> {
        self.update_actions(conn, old.id, &old.actions, &menu.actions).await?;
        self.update_child_parent_path(conn, old, menu).await?;
        self.menu_repo.update(conn, old.id, menu).await
    }

    async fn update_actions(
        &self,
        conn: &mut T::Conn,
        menu_id: u64,
        old: &[MenuAction],
        new: &[MenuAction],
    ) -> Result<(), DomainError> {
        let diff = diff_actions(old, new);
        debug!(
            "Menu {} actions: {} added, {} removed, {} kept",
            menu_id,
            diff.added.len(),
            diff.removed.len(),
            diff.updated.len()
        );

        self.create_actions(conn, menu_id, diff.added.iter().copied()).await?;

        for action in &diff.removed {
            self.action_repo.delete(conn, action.id).await?;
            self.resource_repo.delete_by_action_id(conn, action.id).await?;
        }

        for pair in &diff.updated {
            if pair.old.name != pair.new.name {
                let mut renamed = pair.old.clone();
                renamed.name = pair.new.name.clone();
                self.action_repo.update(conn, pair.old.id, &renamed).await?;
            }

            let resources = diff_resources(&pair.old.resources, &pair.new.resources);
            for resource in resources.added {
                let mut resource = resource.clone();
                resource.id = self.ids.next_id();
                resource.action_id = pair.old.id;
                self.resource_repo.create(conn, &resource).await?;
            }
            for resource in resources.removed {
                self.resource_repo.delete(conn, resource.id).await?;
            }
        }

        Ok(())
    }

    /// Rewrite the stored paths of every descendant after a parent change.
    ///
    /// The descendant scan runs on a detached session and sees committed rows
    /// only; the rewrites go through `conn`.
    async fn update_child_parent_path(&self, conn: &mut T::Conn, old: &Menu, menu: &Menu) -> Result<(), DomainError> {
        if old.parent_id == menu.parent_id {
            return Ok(());
        }

        let old_path = old.full_path();
        let params = MenuQueryParams {
            prefix_parent_path: Some(old_path.clone()),
            ..Default::default()
        };
        let descendants = {
            let mut detached = self.trans.detached().await?;
            self.menu_repo
                .query(&mut detached, &params, &MenuQueryOptions::default())
                .await?
                .data
        };

        let new_path = menu.full_path();
        for descendant in &descendants {
            let path = rebase_path(&descendant.parent_path, &old_path, &new_path).ok_or_else(|| {
                DomainError::InternalError(format!(
                    "menu {} path '{}' is not below '{}'",
                    descendant.id, descendant.parent_path, old_path
                ))
            })?;
            self.menu_repo.update_parent_path(conn, descendant.id, &path).await?;
        }

        debug!("Rewrote {} descendant paths of menu {}: '{}' -> '{}'", descendants.len(), old.id, old_path, new_path);
        Ok(())
    }

    /// Delete a leaf menu with its actions and their resources.
    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        let mut conn = self.trans.detached().await?;
        self.menu_repo.get(&mut conn, id).await?.ok_or(DomainError::NotFound)?;

        let params = MenuQueryParams {
            parent_id: Some(id),
            ..MenuQueryParams::count_only()
        };
        let children = self.menu_repo.query(&mut conn, &params, &MenuQueryOptions::default()).await?;
        if children.total() > 0 {
            warn!("Refusing to delete menu {} with {} children", id, children.total());
            return Err(DomainError::ValidationError(format!(
                "Menu {} has child menus and cannot be deleted",
                id
            )));
        }
        drop(conn);

        let mut tx = self.trans.begin().await?;
        let result = self.delete_cascade(&mut tx, id).await;
        complete(self.trans.as_ref(), tx, result).await?;

        info!("Menu deleted: {}", id);
        Ok(())
    }

    async fn delete_cascade(&self, conn: &mut T::Conn, id: u64) -> Result<(), DomainError> {
        self.resource_repo.delete_by_menu_id(conn, id).await?;
        self.action_repo.delete_by_menu_id(conn, id).await?;
        self.menu_repo.delete(conn, id).await
    }

    pub async fn update_status(&self, id: u64, status: MenuStatus) -> Result<(), DomainError> {
        let mut conn = self.trans.detached().await?;
        let menu = self.menu_repo.get(&mut conn, id).await?.ok_or(DomainError::NotFound)?;
        if menu.status == status {
            return Ok(());
        }

        self.menu_repo.update_status(&mut conn, id, status).await?;
        info!("Menu {} status set to {:?}", id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        MockMenuActionRepository, MockMenuActionResourceRepository, MockMenuRepository, MockTransactionManager,
    };
    use rbac_shared::PageResult;

    type MockService = MenuService<
        MockTransactionManager,
        MockMenuRepository,
        MockMenuActionRepository,
        MockMenuActionResourceRepository,
    >;

    fn service(trans: MockTransactionManager, menus: MockMenuRepository) -> MockService {
        MenuService::new(
            Arc::new(trans),
            Arc::new(menus),
            Arc::new(MockMenuActionRepository::new()),
            Arc::new(MockMenuActionResourceRepository::new()),
            Arc::new(IdGenerator::new(1, 1)),
        )
    }

    fn count(total: u64) -> QueryResult<Menu> {
        QueryResult {
            data: Vec::new(),
            page_result: Some(PageResult { total, ..Default::default() }),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_self_parent_without_storage_access() {
        let svc = service(MockTransactionManager::new(), MockMenuRepository::new());

        let result = svc.update(42, Menu::new("Loop", 42, 0)).await;
        assert!(matches!(result, Err(DomainError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_create_with_duplicate_name_never_opens_transaction() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().times(1).returning(|| Ok(()));
        trans.expect_begin().never();

        let mut menus = MockMenuRepository::new();
        menus
            .expect_query()
            .withf(|_, params, _| params.name.as_deref() == Some("Users") && params.parent_id == Some(0))
            .returning(|_, _, _| Ok(count(1)));
        menus.expect_create().never();

        let result = service(trans, menus).create(Menu::new("Users", 0, 0)).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_checks_siblings_with_trimmed_name() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().times(1).returning(|| Ok(()));
        trans.expect_begin().never();

        let mut menus = MockMenuRepository::new();
        menus
            .expect_query()
            .withf(|_, params, _| params.name.as_deref() == Some("Users"))
            .returning(|_, _, _| Ok(count(1)));

        let mut menu = Menu::new("Users", 0, 0);
        menu.name = "Users ".into();
        let result = service(trans, menus).create(menu).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_is_invalid_parent() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().returning(|| Ok(()));
        trans.expect_begin().never();

        let mut menus = MockMenuRepository::new();
        menus.expect_query().returning(|_, _, _| Ok(count(0)));
        menus.expect_get().withf(|_, id| *id == 99).returning(|_, _| Ok(None));

        let result = service(trans, menus).create(Menu::new("Orphan", 99, 0)).await;
        assert!(matches!(result, Err(DomainError::InvalidParent)));
    }

    #[tokio::test]
    async fn test_delete_with_children_is_rejected_before_transaction() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().returning(|| Ok(()));
        trans.expect_begin().never();

        let mut menus = MockMenuRepository::new();
        menus.expect_get().returning(|_, id| {
            let mut menu = Menu::new("Parent", 0, 0);
            menu.id = id;
            Ok(Some(menu))
        });
        menus
            .expect_query()
            .withf(|_, params, _| params.parent_id == Some(7) && params.pagination.only_count)
            .returning(|_, _, _| Ok(count(2)));
        menus.expect_delete().never();

        let result = service(trans, menus).delete(7).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_status_is_idempotent() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().returning(|| Ok(()));

        let mut menus = MockMenuRepository::new();
        menus.expect_get().returning(|_, id| {
            let mut menu = Menu::new("Settings", 0, 0);
            menu.id = id;
            Ok(Some(menu))
        });
        menus.expect_update_status().never();

        let result = service(trans, menus).update_status(3, MenuStatus::Enabled).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_status_of_missing_menu() {
        let mut trans = MockTransactionManager::new();
        trans.expect_detached().returning(|| Ok(()));

        let mut menus = MockMenuRepository::new();
        menus.expect_get().returning(|_, _| Ok(None));

        let result = service(trans, menus).update_status(3, MenuStatus::Disabled).await;
        assert!(matches!(result, Err(DomainError::NotFound)));
    }
}
