//! Store traits implemented by the PostgreSQL repositories and the
//! in-memory stores.
//!
//! File and folder lookups take an [`AccessScope`] which every
//! implementation applies as a row filter, never after the fetch.

pub mod report;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_core::types::pagination::{PageRequest, PageResponse};
use docusphere_entity::access::AccessScope;
use docusphere_entity::account::{Account, CreateAccount, UpdateAccount};
use docusphere_entity::file::{CreateFile, File, UpdateFile};
use docusphere_entity::folder::{CreateFolder, Folder};
use docusphere_entity::history::{CreateHistoryEntry, HistoryAction, HistoryEntry, TargetType};
use docusphere_entity::login::{CreateLoginAttempt, LoginAttempt};
use docusphere_entity::post::{AuthorEngagement, Comment, CreatePost, Post, UpdatePost};
use docusphere_entity::task::{CreateTask, Task, TaskStatus, UpdateTask};

pub use report::{BrowserCount, FileTypeCount, OwnerUsage};

/// Account persistence.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    /// Find an account by its (lower-cased) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    /// List all accounts, newest first.
    async fn list(&self) -> AppResult<Vec<Account>>;
    /// Insert an account. A taken email is a conflict.
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;
    /// Apply a partial update. A taken email is a conflict.
    async fn update(&self, id: Uuid, data: &UpdateAccount) -> AppResult<Option<Account>>;
    /// Delete an account.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Folder hierarchy persistence.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Find a folder the scope permits.
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<Folder>>;
    /// Direct child folders of `parent` (root when `None`) the scope permits.
    async fn list_children(
        &self,
        parent: Option<Uuid>,
        scope: AccessScope,
    ) -> AppResult<Vec<Folder>>;
    /// Every folder owned by the account.
    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Folder>>;
    /// Insert a folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;
    /// Set name and path.
    async fn rename(&self, id: Uuid, name: &str, path: &str) -> AppResult<Option<Folder>>;
    /// Set the visibility flag.
    async fn set_visibility(&self, id: Uuid, is_public: bool) -> AppResult<Option<Folder>>;
    /// Set parent and path.
    async fn move_to(&self, id: Uuid, parent: Option<Uuid>, path: &str)
    -> AppResult<Option<Folder>>;
    /// Rewrite the paths of every descendant of `id` from `old_prefix` to
    /// `new_prefix`. Returns the number of folders rewritten.
    async fn rebase_descendants(&self, id: Uuid, old_prefix: &str, new_prefix: &str)
    -> AppResult<u64>;
    /// Whether `candidate` is `ancestor` itself or lies below it.
    async fn is_within(&self, ancestor: Uuid, candidate: Uuid) -> AppResult<bool>;
    /// Point every direct child folder of `from` at `to`.
    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64>;
    /// Delete a single folder row.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// Add accounts to the share list (set semantics).
    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>>;
    /// Remove accounts from the share list.
    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>>;
    /// Total number of folders.
    async fn count(&self) -> AppResult<i64>;
}

/// File persistence and file aggregates.
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Find a file the scope permits.
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<File>>;
    /// Files directly in `parent` (root when `None`) the scope permits.
    async fn list_in(&self, parent: Option<Uuid>, scope: AccessScope) -> AppResult<Vec<File>>;
    /// Files shared with the account.
    async fn list_shared_with(&self, account: Uuid) -> AppResult<Vec<File>>;
    /// Files the owner shared with at least one account.
    async fn list_shared_by(&self, owner: Uuid) -> AppResult<Vec<File>>;
    /// Insert a file. A reused asset id is a conflict.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;
    /// Apply a metadata update.
    async fn update(&self, id: Uuid, data: &UpdateFile) -> AppResult<Option<File>>;
    /// Set the parent folder.
    async fn move_to(&self, id: Uuid, parent: Option<Uuid>) -> AppResult<Option<File>>;
    /// Point every file in `from` at `to`.
    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64>;
    /// Delete a file row.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// Add accounts to the share list (set semantics).
    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>>;
    /// Remove accounts from the share list.
    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>>;
    /// Total number of files.
    async fn count(&self) -> AppResult<i64>;
    /// Sum of all file sizes.
    async fn total_size(&self) -> AppResult<i64>;
    /// File counts grouped by MIME type.
    async fn count_by_mime(&self) -> AppResult<Vec<FileTypeCount>>;
    /// Stored bytes grouped by owner.
    async fn usage_by_owner(&self) -> AppResult<Vec<OwnerUsage>>;
    /// Bytes uploaded in `[from, to)`.
    async fn size_created_between(&self, from: DateTime<Utc>, to: DateTime<Utc>)
    -> AppResult<i64>;
}

/// Filters for history queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    /// Only entries with this action.
    pub action: Option<HistoryAction>,
    /// Only entries about this kind of resource.
    pub target_type: Option<TargetType>,
}

/// Append-only activity log.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Append an entry.
    async fn append(&self, data: &CreateHistoryEntry) -> AppResult<HistoryEntry>;
    /// Page through entries, newest first.
    async fn search(
        &self,
        filter: &HistoryFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HistoryEntry>>;
    /// Number of entries with `action` in `[from, to)`.
    async fn count_action_between(
        &self,
        action: HistoryAction,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64>;
    /// Number of distinct actors since `since`.
    async fn count_actors_since(&self, since: DateTime<Utc>) -> AppResult<i64>;
}

/// Authentication attempt log.
#[async_trait]
pub trait LoginAttemptStore: Send + Sync + 'static {
    /// Record an attempt.
    async fn record(&self, data: &CreateLoginAttempt) -> AppResult<LoginAttempt>;
    /// Attempts since `since`, oldest first.
    async fn find_since(&self, since: DateTime<Utc>) -> AppResult<Vec<LoginAttempt>>;
    /// Most common browsers among successful attempts.
    async fn top_browsers(&self, limit: i64) -> AppResult<Vec<BrowserCount>>;
}

/// Task board persistence.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Insert a task.
    async fn create(&self, data: &CreateTask) -> AppResult<Task>;
    /// Find a task the account created or is assigned to.
    async fn find_involving(&self, id: Uuid, account: Uuid) -> AppResult<Option<Task>>;
    /// Tasks the account created or is assigned to, newest first.
    async fn list_involving(
        &self,
        account: Uuid,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<Task>>;
    /// Apply a partial update.
    async fn update(&self, id: Uuid, data: &UpdateTask) -> AppResult<Option<Task>>;
    /// Delete a task.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Community feed persistence.
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    /// Insert a post.
    async fn create(&self, data: &CreatePost) -> AppResult<Post>;
    /// Find a post by ID.
    async fn find(&self, id: Uuid) -> AppResult<Option<Post>>;
    /// All posts, newest first.
    async fn list(&self) -> AppResult<Vec<Post>>;
    /// Apply a partial update.
    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Option<Post>>;
    /// Delete a post.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// Append a comment in a single atomic write.
    async fn push_comment(&self, id: Uuid, comment: &Comment) -> AppResult<Option<Post>>;
    /// Add the account to the like set, or remove it when already present,
    /// in a single atomic write.
    async fn toggle_like(&self, id: Uuid, account: Uuid) -> AppResult<Option<Post>>;
    /// Posts, likes and comments per author.
    async fn author_engagement(&self) -> AppResult<Vec<AuthorEngagement>>;
}
