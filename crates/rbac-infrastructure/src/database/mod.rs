//! Database module (PostgreSQL and in-memory adapters)

pub mod connection;
pub mod memory;
pub mod postgres;

pub use connection::create_pool;
pub use memory::{
    MemoryDatabase, MemoryMenuActionRepository, MemoryMenuActionResourceRepository, MemoryMenuRepository,
    MemorySession,
};
pub use postgres::{
    PgMenuActionRepository, PgMenuActionResourceRepository, PgMenuRepository, PgSession, PgTransactionManager,
};
