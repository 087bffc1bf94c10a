//! Domain services (business logic)

pub mod menu_diff;
pub mod menu_service;

pub use menu_diff::{diff_actions, diff_resources, ActionDiff, ActionPair, ResourceDiff};
pub use menu_service::MenuService;
