//! History entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::{HistoryAction, TargetType};
use crate::snapshot::OwnerSnapshot;

/// An immutable record of an action taken on a resource.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Acting account ID.
    pub actor_id: Uuid,
    /// Acting account display name at the time.
    pub actor_name: String,
    /// Acting account avatar at the time.
    pub actor_avatar: Option<String>,
    /// What happened.
    pub action_type: HistoryAction,
    /// Kind of resource acted on.
    pub target_type: TargetType,
    /// Resource acted on.
    pub target_id: Uuid,
    /// Human-readable description.
    pub details: String,
    /// Structured extra data (old/new names, share lists, sizes).
    pub metadata: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHistoryEntry {
    /// Acting account snapshot.
    pub actor: OwnerSnapshot,
    /// What happened.
    pub action_type: HistoryAction,
    /// Kind of resource acted on.
    pub target_type: TargetType,
    /// Resource acted on.
    pub target_id: Uuid,
    /// Human-readable description.
    pub details: String,
    /// Structured extra data.
    pub metadata: Option<serde_json::Value>,
}
