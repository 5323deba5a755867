//! Login attempt repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_entity::login::{CreateLoginAttempt, LoginAttempt};

use crate::store::{BrowserCount, LoginAttemptStore};

/// Repository for the login attempt log.
#[derive(Debug, Clone)]
pub struct LoginAttemptRepository {
    pool: PgPool,
}

impl LoginAttemptRepository {
    /// Create a new login attempt repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginAttemptStore for LoginAttemptRepository {
    async fn record(&self, data: &CreateLoginAttempt) -> AppResult<LoginAttempt> {
        sqlx::query_as::<_, LoginAttempt>(
            "INSERT INTO login_attempts (id, account_id, email, ip_address, user_agent, browser, \
                 os, device, country, success, failure_reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.account_id)
        .bind(&data.email)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(&data.browser)
        .bind(&data.os)
        .bind(&data.device)
        .bind(&data.country)
        .bind(data.success)
        .bind(&data.failure_reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record login attempt", e)
        })
    }

    async fn find_since(&self, since: DateTime<Utc>) -> AppResult<Vec<LoginAttempt>> {
        sqlx::query_as::<_, LoginAttempt>(
            "SELECT * FROM login_attempts WHERE created_at >= $1 ORDER BY created_at ASC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list login attempts", e)
        })
    }

    async fn top_browsers(&self, limit: i64) -> AppResult<Vec<BrowserCount>> {
        sqlx::query_as::<_, BrowserCount>(
            "SELECT browser, COUNT(*) AS count FROM login_attempts WHERE success \
             GROUP BY browser ORDER BY count DESC, browser ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to group logins by browser", e)
        })
    }
}
