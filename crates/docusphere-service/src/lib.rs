//! # docusphere-service
//!
//! Business logic service layer for Docusphere. Each service orchestrates
//! the stores, the asset store and the auth helpers to implement one
//! application-level use case family.
//!
//! Services take all of their dependencies as `Arc`s
//! at construction time.

pub mod account;
pub mod auth;
pub mod context;
pub mod file;
pub mod folder;
pub mod history;
pub mod post;
pub mod report;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use account::AccountService;
pub use auth::AuthService;
pub use context::RequestContext;
pub use file::{DownloadService, FileService, UploadService};
pub use folder::FolderService;
pub use history::HistoryRecorder;
pub use post::PostService;
pub use report::StatisticsService;
pub use task::TaskService;
