//! In-memory login attempt log.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_entity::login::{CreateLoginAttempt, LoginAttempt};

use crate::store::{BrowserCount, LoginAttemptStore};

/// Login attempts kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryLoginAttemptStore {
    attempts: RwLock<Vec<LoginAttempt>>,
}

impl MemoryLoginAttemptStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginAttemptStore for MemoryLoginAttemptStore {
    async fn record(&self, data: &CreateLoginAttempt) -> AppResult<LoginAttempt> {
        let attempt = LoginAttempt {
            id: Uuid::now_v7(),
            account_id: data.account_id,
            email: data.email.clone(),
            ip_address: data.ip_address.clone(),
            user_agent: data.user_agent.clone(),
            browser: data.browser.clone(),
            os: data.os.clone(),
            device: data.device.clone(),
            country: data.country.clone(),
            success: data.success,
            failure_reason: data.failure_reason.clone(),
            created_at: Utc::now(),
        };
        self.attempts.write().await.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_since(&self, since: DateTime<Utc>) -> AppResult<Vec<LoginAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|a| a.created_at >= since)
            .cloned()
            .collect())
    }

    async fn top_browsers(&self, limit: i64) -> AppResult<Vec<BrowserCount>> {
        let attempts = self.attempts.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for attempt in attempts.iter().filter(|a| a.success) {
            *counts.entry(attempt.browser.as_str()).or_default() += 1;
        }
        let mut rows: Vec<BrowserCount> = counts
            .into_iter()
            .map(|(browser, count)| BrowserCount {
                browser: browser.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.browser.cmp(&b.browser)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}
