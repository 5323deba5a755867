//! Embedded schema migrations.

use tracing::info;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;

use crate::connection::DatabasePool;

/// Apply every pending migration from `migrations/`.
pub async fn run_migrations(db: &DatabasePool) -> AppResult<()> {
    sqlx::migrate!("../../migrations")
        .run(db.pool())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to run migrations", e))?;
    info!("Database schema is up to date");
    Ok(())
}
