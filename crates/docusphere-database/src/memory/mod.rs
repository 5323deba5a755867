//! In-memory implementations of the store traits.
//!
//! Each store keeps its rows in a [`dashmap::DashMap`]. Single-row set
//! mutations (share lists, likes, comments) run under the shard write lock
//! held by `get_mut`, which makes them atomic with respect to each other.
//! Used for tests and for running the service without PostgreSQL.

pub mod account;
pub mod file;
pub mod folder;
pub mod history;
pub mod login;
pub mod post;
pub mod task;

pub use account::MemoryAccountStore;
pub use file::MemoryFileStore;
pub use folder::MemoryFolderStore;
pub use history::MemoryHistoryStore;
pub use login::MemoryLoginAttemptStore;
pub use post::MemoryPostStore;
pub use task::MemoryTaskStore;

use uuid::Uuid;

/// Add `accounts` to `list`, skipping the ones already present.
pub(crate) fn add_to_set(list: &mut Vec<Uuid>, accounts: &[Uuid]) {
    for account in accounts {
        if !list.contains(account) {
            list.push(*account);
        }
    }
}

/// Remove every entry of `accounts` from `list`.
pub(crate) fn remove_from_set(list: &mut Vec<Uuid>, accounts: &[Uuid]) {
    list.retain(|a| !accounts.contains(a));
}
