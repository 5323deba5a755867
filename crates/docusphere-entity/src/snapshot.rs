//! Denormalized owner snapshot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display fields of an account captured when a record was created.
///
/// Later profile edits do not rewrite snapshots. Permission checks use
/// only `id`, which always refers to the live account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    /// Account identifier.
    pub id: Uuid,
    /// Display name at creation time.
    pub name: String,
    /// Avatar URL at creation time.
    pub avatar: Option<String>,
}
