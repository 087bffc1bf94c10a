//! Reconciliation of menu action and resource collections
//!
//! Actions are identified by `code`, resources by `(method, path)`. Any other
//! field is ignored when matching; callers compare action names themselves.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{MenuAction, MenuActionResource};

/// Existing action paired with its incoming replacement.
#[derive(Debug, Clone, Copy)]
pub struct ActionPair<'a> {
    pub old: &'a MenuAction,
    pub new: &'a MenuAction,
}

#[derive(Debug, Default)]
pub struct ActionDiff<'a> {
    pub added: Vec<&'a MenuAction>,
    pub removed: Vec<&'a MenuAction>,
    pub updated: Vec<ActionPair<'a>>,
}

impl<'a> ActionDiff<'a> {
    /// Matched pairs whose action name changed
    pub fn renamed(&self) -> impl Iterator<Item = &ActionPair<'a>> + '_ {
        self.updated.iter().filter(|pair| pair.old.name != pair.new.name)
    }

    /// True when applying the diff would write nothing: no additions or
    /// removals, no renames and no resource changes in any matched pair.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.iter().all(|pair| {
                pair.old.name == pair.new.name
                    && diff_resources(&pair.old.resources, &pair.new.resources).is_empty()
            })
    }
}

/// Resources have no mutable fields, so they are only added or removed.
#[derive(Debug, Default)]
pub struct ResourceDiff<'a> {
    pub added: Vec<&'a MenuActionResource>,
    pub removed: Vec<&'a MenuActionResource>,
}

impl ResourceDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Index `items` by key. Keys keep the position of their first occurrence,
/// values are taken from the last one.
fn keyed<'a, T, K, F>(items: &'a [T], key: F) -> (Vec<K>, HashMap<K, &'a T>)
where
    K: Eq + Hash + Clone,
    F: Fn(&'a T) -> K,
{
    let mut order = Vec::with_capacity(items.len());
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let k = key(item);
        if map.insert(k.clone(), item).is_none() {
            order.push(k);
        }
    }
    (order, map)
}

/// Split the incoming keys into matched and new ones, consuming matches from
/// the old index so that whatever stays there has been removed.
fn partition<'a, T, K, F>(old: &'a [T], new: &'a [T], key: F) -> (Vec<&'a T>, Vec<&'a T>, Vec<(&'a T, &'a T)>)
where
    K: Eq + Hash + Clone,
    F: Fn(&'a T) -> K + Copy,
{
    let (old_order, mut old_map) = keyed(old, key);
    let (new_order, new_map) = keyed(new, key);

    let mut added = Vec::new();
    let mut matched = Vec::new();
    for k in &new_order {
        let item = new_map[k];
        match old_map.remove(k) {
            Some(previous) => matched.push((previous, item)),
            None => added.push(item),
        }
    }

    let removed = old_order
        .iter()
        .filter_map(|k| old_map.remove(k))
        .collect();

    (added, removed, matched)
}

pub fn diff_actions<'a>(old: &'a [MenuAction], new: &'a [MenuAction]) -> ActionDiff<'a> {
    let (added, removed, matched) = partition(old, new, |a: &'a MenuAction| a.code.as_str());
    ActionDiff {
        added,
        removed,
        updated: matched
            .into_iter()
            .map(|(old, new)| ActionPair { old, new })
            .collect(),
    }
}

pub fn diff_resources<'a>(
    old: &'a [MenuActionResource],
    new: &'a [MenuActionResource],
) -> ResourceDiff<'a> {
    let (added, removed, _) = partition(old, new, |r: &'a MenuActionResource| r.key());
    ResourceDiff { added, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: u64, code: &str, name: &str, resources: &[(&str, &str)]) -> MenuAction {
        let mut a = MenuAction::new(code, name).with_resources(
            resources
                .iter()
                .enumerate()
                .map(|(i, (method, path))| {
                    let mut r = MenuActionResource::new(method, path);
                    r.id = id * 100 + i as u64;
                    r.action_id = id;
                    r
                })
                .collect(),
        );
        a.id = id;
        a
    }

    #[test]
    fn test_identical_collections_are_a_noop() {
        let old = vec![
            action(1, "add", "Add", &[("POST", "/api/v1/menus")]),
            action(2, "del", "Delete", &[("DELETE", "/api/v1/menus/:id")]),
        ];
        let diff = diff_actions(&old, &old);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(diff.renamed().count(), 0);
        assert!(diff.is_noop());
    }

    #[test]
    fn test_resource_change_is_not_a_noop() {
        let old = vec![action(1, "add", "Add", &[("POST", "/api/v1/menus")])];
        let new = vec![action(0, "add", "Add", &[("PUT", "/api/v1/menus")])];
        assert!(!diff_actions(&old, &new).is_noop());
    }

    #[test]
    fn test_actions_are_matched_by_code() {
        let old = vec![
            action(1, "add", "Add", &[]),
            action(2, "edit", "Edit", &[]),
            action(3, "del", "Delete", &[]),
        ];
        let new = vec![
            action(0, "edit", "Modify", &[]),
            action(0, "query", "Query", &[]),
            action(0, "add", "Add", &[]),
        ];

        let diff = diff_actions(&old, &new);
        let added: Vec<_> = diff.added.iter().map(|a| a.code.as_str()).collect();
        let removed: Vec<_> = diff.removed.iter().map(|a| a.code.as_str()).collect();
        let updated: Vec<_> = diff.updated.iter().map(|p| (p.old.id, p.new.code.as_str())).collect();

        assert_eq!(added, vec!["query"]);
        assert_eq!(removed, vec!["del"]);
        assert_eq!(updated, vec![(2, "edit"), (1, "add")]);

        let renamed: Vec<_> = diff.renamed().map(|p| p.new.name.as_str()).collect();
        assert_eq!(renamed, vec!["Modify"]);
    }

    #[test]
    fn test_resources_are_matched_by_method_and_path() {
        let old = action(1, "edit", "Edit", &[("GET", "/api/v1/menus/:id"), ("PUT", "/api/v1/menus/:id")]);
        let new = action(0, "edit", "Edit", &[("PUT", "/api/v1/menus/:id"), ("PATCH", "/api/v1/menus/:id")]);

        let diff = diff_resources(&old.resources, &new.resources);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].method, "PATCH");
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].id, 100);
    }

    #[test]
    fn test_duplicate_codes_keep_last_value() {
        let new = vec![action(0, "add", "First", &[]), action(0, "add", "Second", &[])];
        let diff = diff_actions(&[], &new);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].name, "Second");
    }

    #[test]
    fn test_everything_removed() {
        let old = vec![action(1, "add", "Add", &[]), action(2, "edit", "Edit", &[])];
        let diff = diff_actions(&old, &[]);
        assert_eq!(diff.removed.len(), 2);
        assert!(diff.added.is_empty() && diff.updated.is_empty());
    }
}
