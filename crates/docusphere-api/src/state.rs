//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docusphere_core::config::AppConfig;
use docusphere_core::traits::asset::AssetStore;
use docusphere_database::Stores;
use docusphere_service::{
    AccountService, AuthService, DownloadService, FileService, FolderService, HistoryRecorder,
    PostService, StatisticsService, TaskService, UploadService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Services are
/// `Arc`-wrapped so cloning the state per request is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Store handles (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Remote binary store
    pub assets: Arc<dyn AssetStore>,

    /// Registration, login and token resolution
    pub auth_service: Arc<AuthService>,
    /// Account administration
    pub account_service: Arc<AccountService>,
    /// File metadata operations
    pub file_service: Arc<FileService>,
    /// File uploads
    pub upload_service: Arc<UploadService>,
    /// Download and preview URLs
    pub download_service: Arc<DownloadService>,
    /// Folder hierarchy
    pub folder_service: Arc<FolderService>,
    /// Activity log
    pub history: HistoryRecorder,
    /// Task board
    pub task_service: Arc<TaskService>,
    /// Community feed
    pub post_service: Arc<PostService>,
    /// Dashboard aggregates
    pub statistics_service: Arc<StatisticsService>,
}

impl AppState {
    /// Wire every service on top of the given stores and asset store.
    pub fn new(config: AppConfig, stores: Stores, assets: Arc<dyn AssetStore>) -> Self {
        let history = HistoryRecorder::new(Arc::clone(&stores.history));

        let auth_service = AuthService::new(
            Arc::clone(&stores.accounts),
            Arc::clone(&stores.logins),
            &config.auth,
        );
        let account_service = AccountService::new(Arc::clone(&stores.accounts), &config.auth);
        let file_service = FileService::new(
            Arc::clone(&stores.files),
            Arc::clone(&stores.folders),
            Arc::clone(&assets),
            history.clone(),
        );
        let upload_service = UploadService::new(
            Arc::clone(&stores.files),
            Arc::clone(&stores.folders),
            Arc::clone(&assets),
            history.clone(),
            config.storage.max_upload_size_bytes,
        );
        let download_service = DownloadService::new(
            Arc::clone(&stores.files),
            Arc::clone(&assets),
            history.clone(),
        );
        let folder_service = FolderService::new(
            Arc::clone(&stores.folders),
            Arc::clone(&stores.files),
            history.clone(),
        );
        let task_service = TaskService::new(Arc::clone(&stores.tasks), history.clone());
        let post_service = PostService::new(
            Arc::clone(&stores.posts),
            Arc::clone(&assets),
            config.storage.max_attachment_size_bytes,
            config.dashboard.top_authors_limit,
        );
        let statistics_service = StatisticsService::new(
            Arc::clone(&stores.files),
            Arc::clone(&stores.folders),
            Arc::clone(&stores.history),
            Arc::clone(&stores.logins),
            config.dashboard.clone(),
        );

        Self {
            config: Arc::new(config),
            stores,
            assets,
            auth_service: Arc::new(auth_service),
            account_service: Arc::new(account_service),
            file_service: Arc::new(file_service),
            upload_service: Arc::new(upload_service),
            download_service: Arc::new(download_service),
            folder_service: Arc::new(folder_service),
            history,
            task_service: Arc::new(task_service),
            post_service: Arc::new(post_service),
            statistics_service: Arc::new(statistics_service),
        }
    }
}
