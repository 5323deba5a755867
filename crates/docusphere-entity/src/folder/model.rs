//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::access::Shareable;
use crate::snapshot::OwnerSnapshot;

/// A folder in the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Materialized path (e.g., `/documents/reports`).
    pub path: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Owner account ID.
    pub owner_id: Uuid,
    /// Owner display name at creation time.
    pub owner_name: String,
    /// Owner avatar at creation time.
    pub owner_avatar: Option<String>,
    /// Whether the folder is visible to everyone.
    pub is_public: bool,
    /// Accounts the folder is shared with.
    pub shared_with: Vec<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The owner snapshot.
    pub fn owner(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.owner_id,
            name: self.owner_name.clone(),
            avatar: self.owner_avatar.clone(),
        }
    }
}

impl Shareable for Folder {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn shared_with(&self) -> &[Uuid] {
        &self.shared_with
    }

    fn is_public(&self) -> bool {
        self.is_public
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Materialized path.
    pub path: String,
    /// Parent folder (None for root).
    pub parent_id: Option<Uuid>,
    /// Owner snapshot.
    pub owner: OwnerSnapshot,
}
