//! Folder domain entities.

pub mod model;
pub mod path;

pub use model::{CreateFolder, Folder};
