//! # docusphere-auth
//!
//! Authentication and authorization building blocks for Docusphere.
//!
//! ## Modules
//!
//! - `jwt` — session token issuance and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `access` — the owner/share/public visibility gate and role checks
//! - `client` — browser, OS and device detection from the User-Agent

pub mod access;
pub mod client;
pub mod jwt;
pub mod password;

pub use access::AccessEvaluator;
pub use client::ClientInfo;
pub use jwt::{Claims, JwtDecoder, JwtEncoder, SessionToken};
pub use password::{PasswordHasher, PasswordValidator};
