//! Task board entities.

pub mod model;
pub mod status;

pub use model::{CreateTask, Task, UpdateTask};
pub use status::{TaskPriority, TaskStatus};
