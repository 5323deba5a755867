//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::access::Shareable;
use crate::snapshot::OwnerSnapshot;

/// A file whose content lives in the asset store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type of the file.
    pub mime_type: String,
    /// Parent folder ID (null at the root).
    pub parent_id: Option<Uuid>,
    /// Owner account ID.
    pub owner_id: Uuid,
    /// Owner display name at upload time.
    pub owner_name: String,
    /// Owner avatar at upload time.
    pub owner_avatar: Option<String>,
    /// Whether the file is visible to everyone.
    pub is_public: bool,
    /// Accounts the file is shared with.
    pub shared_with: Vec<Uuid>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Unique asset id in the asset store.
    pub asset_id: String,
    /// Canonical asset URL.
    pub secure_url: String,
    /// Asset format.
    pub format: String,
    /// Asset delivery class.
    pub resource_type: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// The owner snapshot.
    pub fn owner(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.owner_id,
            name: self.owner_name.clone(),
            avatar: self.owner_avatar.clone(),
        }
    }

    /// The asset store reference.
    pub fn storage_ref(&self) -> StorageRef {
        StorageRef {
            asset_id: self.asset_id.clone(),
            secure_url: self.secure_url.clone(),
            format: self.format.clone(),
            resource_type: self.resource_type.clone(),
        }
    }

    /// Check if the file is an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Check if the file is a PDF document.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}

impl Shareable for File {
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

/// Where the content of a file lives in the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRef {
    /// Unique asset id.
    pub asset_id: String,
    /// Canonical asset URL.
    pub secure_url: String,
    /// Asset format.
    pub format: String,
    /// Asset delivery class.
    pub resource_type: String,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Parent folder.
    pub parent_id: Option<Uuid>,
    /// Owner snapshot.
    pub owner: OwnerSnapshot,
    /// Visibility flag.
    pub is_public: bool,
    /// Tags.
    pub tags: Vec<String>,
    /// Asset store reference.
    pub storage: StorageRef,
}

/// Metadata update of a file. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFile {
    /// New name.
    pub name: Option<String>,
    /// New visibility flag.
    pub is_public: Option<bool>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}
