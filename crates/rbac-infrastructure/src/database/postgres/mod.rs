//! PostgreSQL repository implementations

pub mod session;
pub mod query_util;
pub mod menu_repo_impl;
pub mod menu_action_repo_impl;
pub mod menu_action_resource_repo_impl;

pub use session::{PgSession, PgTransactionManager};
pub use menu_repo_impl::PgMenuRepository;
pub use menu_action_repo_impl::PgMenuActionRepository;
pub use menu_action_resource_repo_impl::PgMenuActionResourceRepository;
