//! Folder hierarchy operations.

pub mod service;

pub use service::{FolderContents, FolderService};
