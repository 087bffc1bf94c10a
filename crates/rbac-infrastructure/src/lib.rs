//! # RBAC Infrastructure
//! 
//! Storage adapters (PostgreSQL and in-memory) and the menu data loader.

pub mod database;
pub mod seed;

use rbac_core::services::MenuService;

pub use database::{
    create_pool, MemoryDatabase, MemoryMenuActionRepository, MemoryMenuActionResourceRepository,
    MemoryMenuRepository, PgMenuActionRepository, PgMenuActionResourceRepository, PgMenuRepository,
    PgTransactionManager,
};

/// Menu service backed by PostgreSQL
pub type PgMenuService =
    MenuService<PgTransactionManager, PgMenuRepository, PgMenuActionRepository, PgMenuActionResourceRepository>;

/// Menu service backed by the in-memory store
pub type MemoryMenuService =
    MenuService<MemoryDatabase, MemoryMenuRepository, MemoryMenuActionRepository, MemoryMenuActionResourceRepository>;
