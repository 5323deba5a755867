//! # docusphere-storage
//!
//! Asset store adapters for Docusphere. Supports the local filesystem and,
//! with the `s3` feature, S3-compatible object stores.
//!
//! The adapter is selected at runtime based on configuration.

pub mod factory;
pub mod providers;

pub use factory::build_asset_store;
pub use providers::LocalAssetStore;
