//! Activity history entities.

pub mod action;
pub mod model;

pub use action::{HistoryAction, TargetType};
pub use model::{CreateHistoryEntry, HistoryEntry};
