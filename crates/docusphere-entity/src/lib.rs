//! # docusphere-entity
//!
//! Domain entity models for Docusphere. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod access;
pub mod account;
pub mod file;
pub mod folder;
pub mod history;
pub mod login;
pub mod post;
pub mod snapshot;
pub mod task;

pub use access::{AccessScope, Shareable};
pub use snapshot::OwnerSnapshot;
