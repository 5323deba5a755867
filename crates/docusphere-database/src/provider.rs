//! Store bundle that dispatches to the configured persistence provider.

use std::sync::Arc;

use tracing::info;

use docusphere_core::config::{DatabaseConfig, StoreProvider};
use docusphere_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryAccountStore, MemoryFileStore, MemoryFolderStore, MemoryHistoryStore,
    MemoryLoginAttemptStore, MemoryPostStore, MemoryTaskStore,
};
use crate::migration::run_migrations;
use crate::repositories::{
    AccountRepository, FileRepository, FolderRepository, HistoryRepository,
    LoginAttemptRepository, PostRepository, TaskRepository,
};
use crate::store::{
    AccountStore, FileStore, FolderStore, HistoryStore, LoginAttemptStore, PostStore, TaskStore,
};

/// Every store the services need, behind trait objects.
///
/// The provider is selected at construction time based on configuration.
#[derive(Clone)]
pub struct Stores {
    /// Accounts.
    pub accounts: Arc<dyn AccountStore>,
    /// Folder hierarchy.
    pub folders: Arc<dyn FolderStore>,
    /// File metadata.
    pub files: Arc<dyn FileStore>,
    /// Activity log.
    pub history: Arc<dyn HistoryStore>,
    /// Login attempts.
    pub logins: Arc<dyn LoginAttemptStore>,
    /// Task board.
    pub tasks: Arc<dyn TaskStore>,
    /// Community feed.
    pub posts: Arc<dyn PostStore>,
    /// PostgreSQL pool, when that provider is active.
    pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("provider", &self.provider_type())
            .finish_non_exhaustive()
    }
}

impl Stores {
    /// Build the stores from configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Postgres => {
                info!("Initializing PostgreSQL stores");
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(&db).await?;
                }
                Ok(Self::postgres(&db))
            }
            StoreProvider::Memory => {
                info!("Initializing in-memory stores");
                Ok(Self::in_memory())
            }
        }
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            accounts: Arc::new(AccountRepository::new(pool.clone())),
            folders: Arc::new(FolderRepository::new(pool.clone())),
            files: Arc::new(FileRepository::new(pool.clone())),
            history: Arc::new(HistoryRepository::new(pool.clone())),
            logins: Arc::new(LoginAttemptRepository::new(pool.clone())),
            tasks: Arc::new(TaskRepository::new(pool.clone())),
            posts: Arc::new(PostRepository::new(pool)),
            pool: Some(db.clone()),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(MemoryAccountStore::new()),
            folders: Arc::new(MemoryFolderStore::new()),
            files: Arc::new(MemoryFileStore::new()),
            history: Arc::new(MemoryHistoryStore::new()),
            logins: Arc::new(MemoryLoginAttemptStore::new()),
            tasks: Arc::new(MemoryTaskStore::new()),
            posts: Arc::new(MemoryPostStore::new()),
            pool: None,
        }
    }

    /// Name of the active provider.
    pub fn provider_type(&self) -> &'static str {
        let provider = if self.pool.is_some() {
            StoreProvider::Postgres
        } else {
            StoreProvider::Memory
        };
        provider.as_str()
    }

    /// Check that the backing database answers.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(db) => db.ping().await.map(|_| true),
            None => Ok(true),
        }
    }

    /// Release database connections.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docusphere_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider() {
        let config = DatabaseConfig {
            provider: StoreProvider::Memory,
            ..Default::default()
        };
        let stores = Stores::connect(&config).await.unwrap();
        assert_eq!(stores.provider_type(), "memory");
        assert!(stores.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_postgres_requires_url() {
        let config = DatabaseConfig {
            url: String::new(),
            ..Default::default()
        };
        let err = Stores::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
