//! File domain entities.

pub mod model;
pub mod naming;

pub use model::{CreateFile, File, StorageRef, UpdateFile};
