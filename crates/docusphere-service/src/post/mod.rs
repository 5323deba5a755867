//! Community feed.

pub mod service;

pub use service::{CreatePostRequest, PostService, is_allowed_attachment};
