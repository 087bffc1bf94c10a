//! # RBAC Shared
//! 
//! Shared configuration, telemetry, pagination types and id generation for the RBAC admin backend.

pub mod constants;
pub mod types;
pub mod id;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
