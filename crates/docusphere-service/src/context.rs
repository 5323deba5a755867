//! Request context carrying the authenticated caller and client details.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docusphere_entity::account::Identity;
use docusphere_entity::snapshot::OwnerSnapshot;

/// Context for the current authenticated request.
///
/// Extracted by the HTTP layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller, as resolved from the session token.
    pub identity: Identity,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity, ip_address: String, user_agent: Option<String>) -> Self {
        Self {
            identity,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// The caller's account ID.
    pub fn account_id(&self) -> Uuid {
        self.identity.account_id
    }

    /// Snapshot stored on records the caller creates.
    pub fn actor(&self) -> OwnerSnapshot {
        self.identity.snapshot()
    }
}

impl Deref for RequestContext {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.identity
    }
}
