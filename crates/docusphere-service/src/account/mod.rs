//! Account administration and self-service.

pub mod service;

pub use service::{AccountService, ChangePasswordRequest, CreateAccountRequest, UpdateAccountRequest};
