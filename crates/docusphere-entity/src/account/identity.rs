//! The resolved caller of a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::AccountRole;
use crate::snapshot::OwnerSnapshot;

/// The caller as resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account identifier.
    pub account_id: Uuid,
    /// Role at the time the session was issued.
    pub role: AccountRole,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub avatar: Option<String>,
}

impl Identity {
    /// Check if the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Snapshot stored on records this caller creates.
    pub fn snapshot(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.account_id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}
