//! Community feed entities.

pub mod model;

pub use model::{AuthorEngagement, Comment, CreatePost, Post, PostAttachment, UpdatePost};
