// ============================================================================
// RBAC Core - Menu Action Resource Entity
// File: crates/rbac-core/src/domain/menu_action_resource.rs
// Description: API resource (method + path) granted by a menu action
// ============================================================================

use std::collections::HashMap;

use rbac_shared::PaginationParam;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu action resource entity. Identified within its action by method and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuActionResource {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub action_id: u64,

    #[validate(length(min = 1, max = 50, message = "Resource method must be between 1 and 50 characters"))]
    pub method: String,

    #[validate(length(min = 1, max = 255, message = "Resource path must be between 1 and 255 characters"))]
    pub path: String,
}

impl MenuActionResource {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            id: 0,
            action_id: 0,
            method: method.trim().to_uppercase(),
            path: path.trim().to_string(),
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.method, &self.path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuActionResourceQueryParams {
    pub pagination: PaginationParam,
    /// Resources of every action of this menu
    pub menu_id: Option<u64>,
    /// Resources of every action of any of these menus
    pub menu_ids: Vec<u64>,
}

impl MenuActionResourceQueryParams {
    pub fn by_menu(menu_id: u64) -> Self {
        Self { menu_id: Some(menu_id), ..Default::default() }
    }
}

/// Group resources by owning action, keeping their order.
pub fn group_resources_by_action(
    resources: Vec<MenuActionResource>,
) -> HashMap<u64, Vec<MenuActionResource>> {
    let mut grouped: HashMap<u64, Vec<MenuActionResource>> = HashMap::new();
    for resource in resources {
        grouped.entry(resource.action_id).or_default().push(resource);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_normalized() {
        let resource = MenuActionResource::new(" get ", "/api/v1/menus");
        assert_eq!(resource.key(), ("GET", "/api/v1/menus"));
    }
}
