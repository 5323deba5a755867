//! Core type definitions used across the Docusphere workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
