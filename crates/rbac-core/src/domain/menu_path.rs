//! Materialized menu paths
//!
//! A menu's `parent_path` lists its ancestor ids from the root down, joined by
//! `/`. Root menus carry an empty path, their children carry the root id alone.

use rbac_shared::constants::PATH_SEPARATOR;

/// Path of the children of a menu with the given path and id.
pub fn join_parent_path(parent_path: &str, id: u64) -> String {
    if parent_path.is_empty() {
        id.to_string()
    } else {
        format!("{}{}{}", parent_path, PATH_SEPARATOR, id)
    }
}

/// True when `path` is `prefix` itself or lies below it.
///
/// Matching is per segment: `"1/23"` is not below `"1/2"`.
pub fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(PATH_SEPARATOR),
        None => false,
    }
}

/// Move `path` from below `old_prefix` to below `new_prefix`, keeping the
/// remainder verbatim. Returns `None` when `path` is not below `old_prefix`.
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_under(path, old_prefix) {
        return None;
    }
    Some(format!("{}{}", new_prefix, &path[old_prefix.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_parent_path() {
        assert_eq!(join_parent_path("", 100), "100");
        assert_eq!(join_parent_path("100", 205), "100/205");
        assert_eq!(join_parent_path("100/205", 7), "100/205/7");
    }

    #[test]
    fn test_is_under_is_segment_aware() {
        assert!(is_under("1/2", "1/2"));
        assert!(is_under("1/2/3", "1/2"));
        assert!(!is_under("1/23", "1/2"));
        assert!(!is_under("1", "1/2"));
    }

    #[test]
    fn test_rebase_keeps_suffix() {
        assert_eq!(rebase_path("1/2", "1/2", "9").as_deref(), Some("9"));
        assert_eq!(rebase_path("1/2/5/6", "1/2", "9/4/2").as_deref(), Some("9/4/2/5/6"));
        assert_eq!(rebase_path("1/23", "1/2", "9"), None);
    }
}
