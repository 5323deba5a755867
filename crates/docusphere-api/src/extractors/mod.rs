//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::AuthUser;
pub use client::Client;
pub use json::ValidJson;
pub use pagination::HistoryQuery;
pub use path::ValidPath;
