//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::identity::Identity;
use super::role::AccountRole;
use crate::snapshot::OwnerSnapshot;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lower-cased, unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role.
    pub role: AccountRole,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if this account has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The identity a session for this account resolves to.
    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.id,
            role: self.role,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar_url.clone(),
        }
    }

    /// Snapshot of the display fields at this point in time.
    pub fn snapshot(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar_url.clone(),
        }
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Display name.
    pub name: String,
    /// Lower-cased email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: AccountRole,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

/// Partial update of an account. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccount {
    /// New display name.
    pub name: Option<String>,
    /// New lower-cased email address.
    pub email: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New role.
    pub role: Option<AccountRole>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
}

impl UpdateAccount {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.avatar_url.is_none()
    }
}

/// Generated avatar used when an account does not provide one.
pub fn default_avatar_url(name: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_avatar_is_url_encoded() {
        assert_eq!(
            default_avatar_url("Awa Diop"),
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Awa%20Diop"
        );
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateAccount::default().is_empty());
        let update = UpdateAccount {
            role: Some(AccountRole::Editor),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
