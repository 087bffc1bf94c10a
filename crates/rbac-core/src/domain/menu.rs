// ============================================================================
// RBAC Core - Menu Entity
// File: crates/rbac-core/src/domain/menu.rs
// Description: Menu node of the navigation hierarchy
// ============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rbac_shared::{OrderDirection, OrderField, PaginationParam};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::menu_action::MenuAction;

/// Menu status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MenuStatus {
    #[default]
    Enabled,
    Disabled,
}

impl MenuStatus {
    pub fn code(&self) -> i16 {
        match self {
            MenuStatus::Enabled => 1,
            MenuStatus::Disabled => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(MenuStatus::Enabled),
            2 => Some(MenuStatus::Disabled),
            _ => None,
        }
    }
}

/// Whether the menu is rendered in navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    #[default]
    Shown,
    Hidden,
}

impl ShowStatus {
    pub fn code(&self) -> i16 {
        match self {
            ShowStatus::Shown => 1,
            ShowStatus::Hidden => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(ShowStatus::Shown),
            2 => Some(ShowStatus::Hidden),
            _ => None,
        }
    }
}

/// Menu entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Menu {
    pub id: u64,

    #[validate(length(min = 1, max = 50, message = "Menu name must be between 1 and 50 characters"))]
    pub name: String,

    pub sequence: i32,

    #[validate(length(max = 255, message = "Menu icon too long"))]
    pub icon: String,

    #[validate(length(max = 255, message = "Menu router too long"))]
    pub router: String,

    /// 0 for root menus
    pub parent_id: u64,

    /// Ancestor ids joined by `/`, empty at root
    pub parent_path: String,

    pub is_show: ShowStatus,
    pub status: MenuStatus,

    #[validate(length(max = 1024, message = "Menu memo too long"))]
    pub memo: String,

    pub creator: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    #[validate(nested)]
    pub actions: Vec<MenuAction>,
}

impl Menu {
    pub fn new(name: &str, parent_id: u64, sequence: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.trim().to_string(),
            sequence,
            icon: String::new(),
            router: String::new(),
            parent_id,
            parent_path: String::new(),
            is_show: ShowStatus::Shown,
            status: MenuStatus::Enabled,
            memo: String::new(),
            creator: 0,
            created_at: now,
            updated_at: now,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<MenuAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == rbac_shared::constants::ROOT_PARENT_ID
    }

    /// Path handed to children of this menu
    pub fn full_path(&self) -> String {
        super::menu_path::join_parent_path(&self.parent_path, self.id)
    }
}

/// Filters for menu queries. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct MenuQueryParams {
    pub pagination: PaginationParam,
    pub ids: Vec<u64>,
    pub name: Option<String>,
    /// Fuzzy match on name
    pub query_value: Option<String>,
    pub parent_id: Option<u64>,
    /// Subtree filter: paths equal to or below this materialized path
    pub prefix_parent_path: Option<String>,
    pub status: Option<MenuStatus>,
    pub is_show: Option<ShowStatus>,
}

impl MenuQueryParams {
    pub fn count_only() -> Self {
        Self { pagination: PaginationParam::count_only(), ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct MenuQueryOptions {
    pub order_fields: Vec<OrderField>,
}

impl Default for MenuQueryOptions {
    fn default() -> Self {
        Self {
            order_fields: vec![
                OrderField::new("sequence", OrderDirection::Desc),
                OrderField::new("id", OrderDirection::Asc),
            ],
        }
    }
}

/// Attach actions (grouped by menu id) to their menus.
pub fn fill_menu_actions(menus: &mut [Menu], mut actions_by_menu: HashMap<u64, Vec<MenuAction>>) {
    for menu in menus.iter_mut() {
        if let Some(actions) = actions_by_menu.remove(&menu.id) {
            menu.actions = actions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_menu() {
        let menu = Menu::new("  Dashboard ", 0, 10);
        assert_eq!(menu.name, "Dashboard");
        assert!(menu.is_root());
        assert_eq!(menu.status, MenuStatus::Enabled);
        assert_eq!(menu.is_show, ShowStatus::Shown);
        assert!(menu.validate().is_ok());
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let menu = Menu::new("", 0, 0);
        assert!(menu.validate().is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MenuStatus::from_code(MenuStatus::Disabled.code()), Some(MenuStatus::Disabled));
        assert_eq!(ShowStatus::from_code(2), Some(ShowStatus::Hidden));
        assert_eq!(ShowStatus::from_code(0), None);
    }

    #[test]
    fn test_fill_menu_actions() {
        let mut a = Menu::new("A", 0, 0);
        a.id = 1;
        let mut b = Menu::new("B", 0, 0);
        b.id = 2;
        let mut menus = vec![a, b];

        let mut grouped = HashMap::new();
        grouped.insert(2, vec![MenuAction::new("add", "Add")]);
        fill_menu_actions(&mut menus, grouped);

        assert!(menus[0].actions.is_empty());
        assert_eq!(menus[1].actions.len(), 1);
    }
}
