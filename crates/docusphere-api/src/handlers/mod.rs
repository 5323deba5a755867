//! Route handlers organized by domain.

pub mod auth;
pub mod file;
pub mod folder;
pub mod health;
pub mod history;
pub mod post;
pub mod statistics;
pub mod task;
pub mod user;

mod multipart;
