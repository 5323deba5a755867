//! PostgreSQL implementations of the store traits.

pub mod account;
pub mod file;
pub mod folder;
pub mod history;
pub mod login;
pub mod post;
mod scope;
pub mod task;

pub use account::AccountRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use history::HistoryRepository;
pub use login::LoginAttemptRepository;
pub use post::PostRepository;
pub use task::TaskRepository;
