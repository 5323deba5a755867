//! # docusphere-core
//!
//! Core crate for Docusphere. Contains configuration schemas, the unified
//! error system, pagination types and the asset store trait consumed by the
//! hierarchy services.
//!
//! This crate has **no** internal dependencies on other Docusphere crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
