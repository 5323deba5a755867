//! `[server]` section: listener, request limits and CORS.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const WILDCARD: &str = "*";

/// Where and how the HTTP API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Requests running longer than this are answered with 408.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Largest request body accepted, multipart uploads included.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Browser cross-origin policy.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin policy for the browser client. `"*"` in a list means any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API.
    #[serde(default = "wildcard")]
    pub allowed_origins: Vec<String>,
    /// Methods allowed on cross-origin requests.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Request headers allowed on cross-origin requests.
    #[serde(default = "wildcard")]
    pub allowed_headers: Vec<String>,
    /// How long browsers may cache a preflight answer.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl CorsConfig {
    /// Whether every origin is allowed.
    pub fn any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == WILDCARD)
    }

    /// Whether every request header is allowed.
    pub fn any_header(&self) -> bool {
        self.allowed_headers.iter().any(|h| h == WILDCARD)
    }

    /// Preflight cache lifetime.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: wildcard(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: wildcard(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

fn wildcard() -> Vec<String> {
    vec![WILDCARD.to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .map(String::from)
        .to_vec()
}

fn default_max_age() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_any_origin() {
        let cors = CorsConfig::default();
        assert!(cors.any_origin());
        assert!(cors.any_header());
        assert_eq!(cors.allowed_methods.len(), 5);
    }

    #[test]
    fn test_explicit_origins() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://app.docusphere.io".to_string()],
            ..CorsConfig::default()
        };
        assert!(!cors.any_origin());
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..ServerConfig::default()
        };
        assert_eq!(server.bind_address(), "127.0.0.1:9000");
        assert_eq!(server.request_timeout(), Duration::from_secs(30));
    }
}
