//! Registration, login and session resolution.

pub mod service;

pub use service::{AuthService, ClientMeta, LoginResult, RegisterRequest};
