//! Visibility model shared by files and folders.
//!
//! A resource is visible to an account when the account owns it, when the
//! account is in its share list, or when the resource is public. Stores turn
//! an [`AccessScope`] into a query filter so that listings only fetch rows the
//! caller may see; [`AccessScope::permits`] is the same predicate evaluated on
//! an already loaded row.

use uuid::Uuid;

/// A resource that carries an owner, a share list and a visibility flag.
pub trait Shareable {
    /// Live account id of the owner.
    fn owner_id(&self) -> Uuid;
    /// Accounts the resource is shared with.
    fn shared_with(&self) -> &[Uuid];
    /// Whether the resource is visible to everyone.
    fn is_public(&self) -> bool;
}

/// Row filter applied by the hierarchy stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Owned by, shared with, or public to the viewer.
    Visible {
        /// The viewing account.
        viewer: Uuid,
    },
    /// Owned by the account.
    Owned {
        /// The owning account.
        owner: Uuid,
    },
    /// No restriction.
    Unrestricted,
}

impl AccessScope {
    /// Evaluate the scope against a loaded resource.
    pub fn permits<R: Shareable + ?Sized>(&self, resource: &R) -> bool {
        match *self {
            Self::Visible { viewer } => {
                resource.owner_id() == viewer
                    || resource.shared_with().contains(&viewer)
                    || resource.is_public()
            }
            Self::Owned { owner } => resource.owner_id() == owner,
            Self::Unrestricted => true,
        }
    }

    /// The account the scope is bound to, if any.
    pub fn account(&self) -> Option<Uuid> {
        match *self {
            Self::Visible { viewer } => Some(viewer),
            Self::Owned { owner } => Some(owner),
            Self::Unrestricted => None,
        }
    }
}
