//! Login attempt entities.

pub mod model;

pub use model::{CreateLoginAttempt, LoginAttempt};
