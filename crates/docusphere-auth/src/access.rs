//! Access evaluation for files, folders and role-gated operations.
//!
//! Hierarchy resources are never checked after the fetch: the evaluator
//! picks an [`AccessScope`] and the store applies it as a row filter, so a
//! resource the caller may not act on is indistinguishable from a missing
//! one.

use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_entity::access::AccessScope;
use docusphere_entity::account::Identity;

/// Maps a caller and an intent onto a store scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessEvaluator;

impl AccessEvaluator {
    /// Creates a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Scope for reading: owned, shared with, or public. Admins see everything.
    pub fn view_scope(&self, identity: &Identity) -> AccessScope {
        if identity.is_admin() {
            AccessScope::Unrestricted
        } else {
            AccessScope::Visible {
                viewer: identity.account_id,
            }
        }
    }

    /// Scope for rename, move and delete: the owner, or any Admin.
    pub fn manage_scope(&self, identity: &Identity) -> AccessScope {
        if identity.is_admin() {
            AccessScope::Unrestricted
        } else {
            self.owner_scope(identity)
        }
    }

    /// Scope for share, unshare, metadata and visibility changes: the owner only.
    pub fn owner_scope(&self, identity: &Identity) -> AccessScope {
        AccessScope::Owned {
            owner: identity.account_id,
        }
    }

    /// Require the Admin role.
    pub fn require_admin(&self, identity: &Identity) -> AppResult<()> {
        if identity.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin role required"))
        }
    }

    /// Require the caller to be `account_id` or an Admin.
    pub fn require_self_or_admin(&self, identity: &Identity, account_id: Uuid) -> AppResult<()> {
        if identity.account_id == account_id || identity.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Only the account itself or an admin may do this",
            ))
        }
    }
}
