//! Repository traits (ports)

pub mod transaction;
pub mod menu_repository;
pub mod menu_action_repository;
pub mod menu_action_resource_repository;

pub use transaction::{complete, TransactionManager};
pub use menu_repository::MenuRepository;
pub use menu_action_repository::MenuActionRepository;
pub use menu_action_resource_repository::MenuActionResourceRepository;

#[cfg(test)]
pub use transaction::MockTransactionManager;
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
#[cfg(test)]
pub use menu_action_repository::MockMenuActionRepository;
#[cfg(test)]
pub use menu_action_resource_repository::MockMenuActionResourceRepository;
