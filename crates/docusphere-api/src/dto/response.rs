//! Response DTOs.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Wrap `data` in a successful JSON response.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reachability of one backing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Configured provider name.
    pub provider: String,
    /// Whether it answered.
    pub healthy: bool,
}

impl ComponentHealth {
    /// A probe outcome; a failed probe counts as unhealthy.
    pub fn probe<E>(provider: &str, outcome: Result<bool, E>) -> Self {
        Self {
            provider: provider.to_string(),
            healthy: outcome.unwrap_or(false),
        }
    }
}

/// GET /api/health body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every component is healthy, `degraded` otherwise.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Metadata stores.
    pub database: ComponentHealth,
    /// Binary asset store.
    pub asset_store: ComponentHealth,
}

impl HealthResponse {
    /// Summarize the component probes.
    pub fn new(database: ComponentHealth, asset_store: ComponentHealth) -> Self {
        let status = if database.healthy && asset_store.healthy {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            asset_store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_probe_degrades_health() {
        let database = ComponentHealth::probe::<()>("postgres", Err(()));
        let assets = ComponentHealth::probe::<()>("local", Ok(true));
        let health = HealthResponse::new(database, assets);
        assert_eq!(health.status, "degraded");
        assert!(!health.database.healthy);
    }

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(ApiResponse::ok(MessageResponse::new("done"))).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": { "message": "done" } }));
    }
}
