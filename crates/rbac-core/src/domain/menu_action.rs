// ============================================================================
// RBAC Core - Menu Action Entity
// File: crates/rbac-core/src/domain/menu_action.rs
// Description: Operation exposed by a menu (add, edit, delete, ...)
// ============================================================================

use std::collections::HashMap;

use rbac_shared::PaginationParam;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::menu_action_resource::MenuActionResource;

/// Menu action entity. `code` identifies the action within its menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuAction {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub menu_id: u64,

    #[validate(length(min = 1, max = 100, message = "Action code must be between 1 and 100 characters"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Action name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub resources: Vec<MenuActionResource>,
}

impl MenuAction {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            id: 0,
            menu_id: 0,
            code: code.trim().to_string(),
            name: name.trim().to_string(),
            resources: Vec::new(),
        }
    }

    pub fn with_resources(mut self, resources: Vec<MenuActionResource>) -> Self {
        self.resources = resources;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuActionQueryParams {
    pub pagination: PaginationParam,
    pub menu_id: Option<u64>,
    pub ids: Vec<u64>,
}

impl MenuActionQueryParams {
    pub fn by_menu(menu_id: u64) -> Self {
        Self { menu_id: Some(menu_id), ..Default::default() }
    }
}

/// Group actions by owning menu, keeping their order.
pub fn group_actions_by_menu(actions: Vec<MenuAction>) -> HashMap<u64, Vec<MenuAction>> {
    let mut grouped: HashMap<u64, Vec<MenuAction>> = HashMap::new();
    for action in actions {
        grouped.entry(action.menu_id).or_default().push(action);
    }
    grouped
}

/// Attach resources (grouped by action id) to their actions.
pub fn fill_action_resources(
    actions: &mut [MenuAction],
    mut resources_by_action: HashMap<u64, Vec<MenuActionResource>>,
) {
    for action in actions.iter_mut() {
        if let Some(resources) = resources_by_action.remove(&action.id) {
            action.resources = resources;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_actions_by_menu() {
        let mut first = MenuAction::new("add", "Add");
        first.menu_id = 1;
        let mut second = MenuAction::new("edit", "Edit");
        second.menu_id = 1;
        let mut other = MenuAction::new("add", "Add");
        other.menu_id = 2;

        let grouped = group_actions_by_menu(vec![first, second, other]);
        assert_eq!(grouped[&1].len(), 2);
        assert_eq!(grouped[&1][0].code, "add");
        assert_eq!(grouped[&2].len(), 1);
    }

    #[test]
    fn test_fill_action_resources() {
        let mut action = MenuAction::new("query", "Query");
        action.id = 10;
        let mut actions = vec![action];

        let mut resource = MenuActionResource::new("GET", "/api/v1/menus");
        resource.action_id = 10;
        fill_action_resources(&mut actions, HashMap::from([(10, vec![resource])]));

        assert_eq!(actions[0].resources.len(), 1);
        assert_eq!(actions[0].resources[0].method, "GET");
    }
}
