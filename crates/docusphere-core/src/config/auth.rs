//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session token and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session lifetime in minutes. Sessions are not refreshed.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
    /// Issuer claim written into session tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_ttl_minutes: default_session_ttl(),
            issuer: default_issuer(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_session_ttl() -> u64 {
    60
}

fn default_issuer() -> String {
    "docusphere".to_string()
}

fn default_password_min() -> usize {
    6
}
