//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Separator between ancestor ids in a materialized menu path
pub const PATH_SEPARATOR: char = '/';

/// Parent id of root menus
pub const ROOT_PARENT_ID: u64 = 0;

pub const DEFAULT_MENU_DATA_FILE: &str = "config/menu.json";
