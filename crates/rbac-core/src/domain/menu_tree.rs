// ============================================================================
// RBAC Core - Menu Tree
// File: crates/rbac-core/src/domain/menu_tree.rs
// Description: Nested menu representation used for seeding and rendering
// ============================================================================

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::menu::{Menu, MenuStatus, ShowStatus};
use super::menu_action::MenuAction;

/// A menu with its children nested inline.
///
/// Seed files only need `name` plus whatever else they want to override;
/// `is_show` and `status` use the numeric codes of [`ShowStatus`] and
/// [`MenuStatus`], with 0 meaning "default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuTree {
    pub id: u64,
    pub parent_id: u64,
    pub parent_path: String,
    pub name: String,
    pub icon: String,
    pub router: String,
    pub sequence: i32,
    pub is_show: i16,
    pub status: i16,
    pub memo: String,
    pub actions: Vec<MenuAction>,
    pub children: Vec<MenuTree>,
}

impl MenuTree {
    /// Flat menu for this node, to be created under `parent_id`.
    pub fn to_menu(&self, parent_id: u64) -> Menu {
        let mut menu = Menu::new(&self.name, parent_id, self.sequence);
        menu.icon = self.icon.clone();
        menu.router = self.router.clone();
        menu.memo = self.memo.clone();
        if self.is_show > 0 {
            menu.is_show = ShowStatus::from_code(self.is_show).unwrap_or_default();
        }
        if self.status > 0 {
            menu.status = MenuStatus::from_code(self.status).unwrap_or_default();
        }
        menu.actions = self.actions.clone();
        menu
    }

    fn from_menu(menu: &Menu) -> Self {
        Self {
            id: menu.id,
            parent_id: menu.parent_id,
            parent_path: menu.parent_path.clone(),
            name: menu.name.clone(),
            icon: menu.icon.clone(),
            router: menu.router.clone(),
            sequence: menu.sequence,
            is_show: menu.is_show.code(),
            status: menu.status.code(),
            memo: menu.memo.clone(),
            actions: menu.actions.clone(),
            children: Vec::new(),
        }
    }
}

/// Nest a flat menu list by parent id, keeping the list order among siblings.
///
/// Menus whose parent is not in the list become roots, so any subtree query
/// result can be nested.
pub fn build_menu_trees(menus: &[Menu]) -> Vec<MenuTree> {
    let ids: HashSet<u64> = menus.iter().map(|m| m.id).collect();
    let mut children: HashMap<u64, Vec<&Menu>> = HashMap::new();
    let mut roots = Vec::new();

    for menu in menus {
        if ids.contains(&menu.parent_id) && menu.parent_id != menu.id {
            children.entry(menu.parent_id).or_default().push(menu);
        } else {
            roots.push(menu);
        }
    }

    roots.into_iter().map(|m| nest(m, &children)).collect()
}

fn nest(menu: &Menu, children: &HashMap<u64, Vec<&Menu>>) -> MenuTree {
    let mut tree = MenuTree::from_menu(menu);
    if let Some(kids) = children.get(&menu.id) {
        tree.children = kids.iter().map(|kid| nest(kid, children)).collect();
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(id: u64, parent_id: u64, name: &str) -> Menu {
        let mut m = Menu::new(name, parent_id, 0);
        m.id = id;
        m
    }

    #[test]
    fn test_build_menu_trees() {
        let menus = vec![
            menu(1, 0, "System"),
            menu(2, 1, "Menus"),
            menu(3, 1, "Roles"),
            menu(4, 2, "Actions"),
            menu(5, 0, "Profile"),
        ];

        let trees = build_menu_trees(&menus);
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].name, "System");
        assert_eq!(trees[0].children.len(), 2);
        assert_eq!(trees[0].children[0].children[0].name, "Actions");
        assert_eq!(trees[1].name, "Profile");
    }

    #[test]
    fn test_orphans_become_roots() {
        let trees = build_menu_trees(&[menu(7, 3, "Detached"), menu(8, 7, "Leaf")]);
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].children[0].name, "Leaf");
    }

    #[test]
    fn test_seed_defaults() {
        let tree: MenuTree = serde_json::from_str(
            r#"{"name": "Dashboard", "actions": [{"code": "query", "name": "Query"}]}"#,
        )
        .unwrap();
        let menu = tree.to_menu(0);
        assert_eq!(menu.is_show, ShowStatus::Shown);
        assert_eq!(menu.status, MenuStatus::Enabled);
        assert_eq!(menu.actions[0].code, "query");

        let hidden: MenuTree = serde_json::from_str(r#"{"name": "Hidden", "is_show": 2}"#).unwrap();
        assert_eq!(hidden.to_menu(0).is_show, ShowStatus::Hidden);
    }
}
