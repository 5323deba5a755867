//! Core traits defined in `docusphere-core` and implemented by other crates.

pub mod asset;

pub use asset::{AssetStore, AssetUpload, AssetUrlOptions, StoredAsset};
