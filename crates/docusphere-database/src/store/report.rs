//! Aggregate rows returned by the reporting queries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Number of files of one MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileTypeCount {
    /// MIME type.
    pub mime_type: String,
    /// Number of files.
    pub count: i64,
}

/// Bytes stored by one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OwnerUsage {
    /// Owner account ID.
    pub owner_id: Uuid,
    /// Owner name as stored on the most recent file.
    pub owner_name: String,
    /// Total bytes.
    pub bytes: i64,
}

/// Successful logins from one browser family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BrowserCount {
    /// Browser family.
    pub browser: String,
    /// Number of successful attempts.
    pub count: i64,
}
