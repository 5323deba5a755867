//! # docusphere-database
//!
//! Persistence for Docusphere: the store traits the services depend on,
//! their PostgreSQL implementations (`repositories`), in-memory
//! implementations (`memory`) and the [`Stores`] bundle that selects one of
//! the two from configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use provider::Stores;
