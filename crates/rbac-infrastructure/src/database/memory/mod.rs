//! In-memory store implementing every menu repository
//!
//! Committed rows live in one shared table set. A transaction works on a
//! private copy; on commit only the rows it inserted, changed or removed are
//! written back, so detached writes made meanwhile survive. A detached
//! session reads and writes the shared set directly. Transactions are
//! serialized.

pub mod menu_repo;
pub mod menu_action_repo;
pub mod menu_action_resource_repo;

use std::collections::BTreeMap;
use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use rbac_core::domain::{Menu, MenuAction, MenuActionResource};
use rbac_core::error::DomainError;
use rbac_core::repositories::TransactionManager;
use rbac_shared::{PageResult, PaginationParam, QueryResult};

pub use menu_repo::MemoryMenuRepository;
pub use menu_action_repo::MemoryMenuActionRepository;
pub use menu_action_resource_repo::MemoryMenuActionResourceRepository;

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub menus: BTreeMap<u64, Menu>,
    pub actions: BTreeMap<u64, MenuAction>,
    pub resources: BTreeMap<u64, MenuActionResource>,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    committed: Arc<RwLock<MemoryTables>>,
    tx_lock: Arc<Mutex<()>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed tables
    pub fn snapshot(&self) -> MemoryTables {
        self.committed.read().clone()
    }
}

struct Staged {
    /// Committed state when the transaction began
    base: MemoryTables,
    tables: MemoryTables,
    _guard: OwnedMutexGuard<()>,
}

pub struct MemorySession {
    shared: Arc<RwLock<MemoryTables>>,
    tx: Option<Staged>,
}

impl MemorySession {
    pub(crate) fn read<R>(&self, f: impl FnOnce(&MemoryTables) -> R) -> R {
        match &self.tx {
            Some(staged) => f(&staged.tables),
            None => f(&self.shared.read()),
        }
    }

    pub(crate) fn write<R>(&mut self, f: impl FnOnce(&mut MemoryTables) -> R) -> R {
        match &mut self.tx {
            Some(staged) => f(&mut staged.tables),
            None => f(&mut self.shared.write()),
        }
    }
}

#[async_trait]
impl TransactionManager for MemoryDatabase {
    type Conn = MemorySession;

    async fn begin(&self) -> Result<MemorySession, DomainError> {
        let guard = self.tx_lock.clone().lock_owned().await;
        let base = self.snapshot();
        Ok(MemorySession {
            shared: self.committed.clone(),
            tx: Some(Staged {
                tables: base.clone(),
                base,
                _guard: guard,
            }),
        })
    }

    async fn detached(&self) -> Result<MemorySession, DomainError> {
        Ok(MemorySession {
            shared: self.committed.clone(),
            tx: None,
        })
    }

    async fn commit(&self, conn: MemorySession) -> Result<(), DomainError> {
        if let Some(mut staged) = conn.tx {
            let mut committed = self.committed.write();
            let changed = merge(&mut committed.menus, &staged.base.menus, mem::take(&mut staged.tables.menus))
                + merge(&mut committed.actions, &staged.base.actions, mem::take(&mut staged.tables.actions))
                + merge(
                    &mut committed.resources,
                    &staged.base.resources,
                    mem::take(&mut staged.tables.resources),
                );
            debug!("Memory transaction committed ({} rows changed)", changed);
        }
        Ok(())
    }

    async fn rollback(&self, conn: MemorySession) -> Result<(), DomainError> {
        if conn.tx.is_some() {
            debug!("Memory transaction rolled back");
        }
        Ok(())
    }
}

/// Write the rows that differ between `base` and `staged` into `committed`.
/// Returns the number of rows written or removed.
fn merge<T: PartialEq>(committed: &mut BTreeMap<u64, T>, base: &BTreeMap<u64, T>, staged: BTreeMap<u64, T>) -> usize {
    let mut changed = 0;
    for id in base.keys() {
        if !staged.contains_key(id) {
            committed.remove(id);
            changed += 1;
        }
    }
    for (id, row) in staged {
        if base.get(&id) != Some(&row) {
            committed.insert(id, row);
            changed += 1;
        }
    }
    changed
}

/// Apply `page` to an already filtered and ordered row set.
pub(crate) fn paginate<T>(rows: Vec<T>, page: &PaginationParam) -> QueryResult<T> {
    if !page.only_count && !page.pagination {
        return QueryResult { data: rows, page_result: None };
    }

    let result = PageResult {
        total: rows.len() as u64,
        current: page.current(),
        page_size: page.page_size(),
    };
    let data = if page.only_count {
        Vec::new()
    } else {
        rows.into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size() as usize)
            .collect()
    };

    QueryResult { data, page_result: Some(result) }
}

pub(crate) fn duplicate_key(table: &str, id: u64) -> DomainError {
    DomainError::DatabaseError(format!("duplicate key {} in {}", id, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbac_core::domain::MenuStatus;

    #[tokio::test]
    async fn test_transaction_is_invisible_until_commit() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        tx.write(|t| t.menus.insert(1, Menu::new("A", 0, 0)));

        let detached = db.detached().await.unwrap();
        assert!(detached.read(|t| t.menus.is_empty()));

        db.commit(tx).await.unwrap();
        assert_eq!(db.snapshot().menus.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_keeps_detached_writes() {
        let db = MemoryDatabase::new();
        let mut setup = db.detached().await.unwrap();
        setup.write(|t| {
            t.menus.insert(1, Menu::new("A", 0, 0));
            t.menus.insert(2, Menu::new("B", 0, 0));
        });

        let mut tx = db.begin().await.unwrap();
        tx.write(|t| {
            if let Some(menu) = t.menus.get_mut(&2) {
                menu.memo = "from tx".into();
            }
            t.menus.insert(3, Menu::new("C", 0, 0));
        });

        let mut detached = db.detached().await.unwrap();
        detached.write(|t| {
            if let Some(menu) = t.menus.get_mut(&1) {
                menu.status = MenuStatus::Disabled;
            }
        });

        db.commit(tx).await.unwrap();

        let tables = db.snapshot();
        assert_eq!(tables.menus[&1].status, MenuStatus::Disabled);
        assert_eq!(tables.menus[&2].memo, "from tx");
        assert!(tables.menus.contains_key(&3));
    }

    #[tokio::test]
    async fn test_commit_applies_removals_only_for_touched_rows() {
        let db = MemoryDatabase::new();
        let mut setup = db.detached().await.unwrap();
        setup.write(|t| t.menus.insert(1, Menu::new("A", 0, 0)));

        let mut tx = db.begin().await.unwrap();
        tx.write(|t| t.menus.remove(&1));

        let mut detached = db.detached().await.unwrap();
        detached.write(|t| t.menus.insert(2, Menu::new("B", 0, 0)));

        db.commit(tx).await.unwrap();

        let tables = db.snapshot();
        assert!(!tables.menus.contains_key(&1));
        assert!(tables.menus.contains_key(&2));
    }

    #[tokio::test]
    async fn test_rollback_discards_changes() {
        let db = MemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();
        tx.write(|t| t.menus.insert(1, Menu::new("A", 0, 0)));
        db.rollback(tx).await.unwrap();

        assert!(db.snapshot().menus.is_empty());
        // lock released by the rollback
        let tx = db.begin().await.unwrap();
        db.commit(tx).await.unwrap();
    }

    #[test]
    fn test_paginate() {
        let rows: Vec<u32> = (1..=25).collect();

        let all = paginate(rows.clone(), &PaginationParam::default());
        assert_eq!(all.data.len(), 25);
        assert!(all.page_result.is_none());

        let page = paginate(rows.clone(), &PaginationParam::page(3, 10));
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total(), 25);

        let count = paginate(rows, &PaginationParam::count_only());
        assert!(count.data.is_empty());
        assert_eq!(count.total(), 25);
    }
}
