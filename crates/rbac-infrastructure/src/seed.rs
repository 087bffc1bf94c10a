// ============================================================================
// RBAC Infrastructure - Menu Data Loader
// File: crates/rbac-infrastructure/src/seed.rs
// ============================================================================
//! Initial menu data, read from a JSON array of nested menu trees.

use std::path::Path;

use tracing::{info, warn};

use rbac_core::domain::MenuTree;
use rbac_core::error::DomainError;
use rbac_core::repositories::{
    MenuActionRepository, MenuActionResourceRepository, MenuRepository, TransactionManager,
};
use rbac_core::services::MenuService;
use rbac_shared::constants::ROOT_PARENT_ID;

pub async fn load_menu_trees(path: impl AsRef<Path>) -> Result<Vec<MenuTree>, DomainError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!("Cannot read menu data file {}: {}", path.display(), e);
        DomainError::DataFileError(format!("{}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        warn!("Malformed menu data file {}: {}", path.display(), e);
        DomainError::DataFileError(format!("{}: {}", path.display(), e))
    })
}

/// Seed the menu table from `path` unless it already holds rows. The file is
/// only read when seeding is needed. Returns the number of menus created.
pub async fn init_data<T, M, A, R>(
    service: &MenuService<T, M, A, R>,
    path: impl AsRef<Path>,
) -> Result<usize, DomainError>
where
    T: TransactionManager,
    M: MenuRepository<Conn = T::Conn>,
    A: MenuActionRepository<Conn = T::Conn>,
    R: MenuActionResourceRepository<Conn = T::Conn>,
{
    if service.has_menus().await? {
        info!("Menu data already present, skipping {}", path.as_ref().display());
        return Ok(0);
    }

    let trees = load_menu_trees(path).await?;
    service.init_from_tree(ROOT_PARENT_ID, &trees).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_menu_trees() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "System", "sequence": 10, "children": [
                {{"name": "Menus", "actions": [
                    {{"code": "query", "name": "Query", "resources": [{{"method": "get", "path": "/api/v1/menus"}}]}}
                ]}}
            ]}}]"#
        )
        .unwrap();

        let trees = load_menu_trees(file.path()).await.unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].sequence, 10);
        let menus = &trees[0].children[0];
        assert_eq!(menus.name, "Menus");
        assert_eq!(menus.actions[0].resources[0].path, "/api/v1/menus");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_menu_trees(dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(DomainError::DataFileError(_))));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"name\": ").unwrap();
        let result = load_menu_trees(file.path()).await;
        assert!(matches!(result, Err(DomainError::DataFileError(_))));
    }
}
