//! # RBAC Core - Domain Module
//! 
//! Menu hierarchy entities.

pub mod menu;
pub mod menu_path;
pub mod menu_tree;
pub mod menu_action;
pub mod menu_action_resource;

// Re-export all entities and enums
pub use menu::{fill_menu_actions, Menu, MenuQueryOptions, MenuQueryParams, MenuStatus, ShowStatus};
pub use menu_tree::{build_menu_trees, MenuTree};
pub use menu_action::{fill_action_resources, group_actions_by_menu, MenuAction, MenuActionQueryParams};
pub use menu_action_resource::{group_resources_by_action, MenuActionResource, MenuActionResourceQueryParams};
