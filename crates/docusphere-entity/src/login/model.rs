//! Login attempt entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authentication attempt, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginAttempt {
    /// Unique attempt identifier.
    pub id: Uuid,
    /// Matched account, when the email resolved to one.
    pub account_id: Option<Uuid>,
    /// Email that was submitted.
    pub email: String,
    /// Client IP address.
    pub ip_address: String,
    /// Raw User-Agent header.
    pub user_agent: String,
    /// Browser family derived from the User-Agent.
    pub browser: String,
    /// Operating system derived from the User-Agent.
    pub os: String,
    /// Device class derived from the User-Agent.
    pub device: String,
    /// Country, when known.
    pub country: Option<String>,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Why the attempt failed.
    pub failure_reason: Option<String>,
    /// When the attempt happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a login attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoginAttempt {
    /// Matched account.
    pub account_id: Option<Uuid>,
    /// Submitted email.
    pub email: String,
    /// Client IP address.
    pub ip_address: String,
    /// Raw User-Agent header.
    pub user_agent: String,
    /// Browser family.
    pub browser: String,
    /// Operating system.
    pub os: String,
    /// Device class.
    pub device: String,
    /// Country, when known.
    pub country: Option<String>,
    /// Outcome.
    pub success: bool,
    /// Failure reason.
    pub failure_reason: Option<String>,
}
