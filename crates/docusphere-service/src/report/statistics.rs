//! Dashboard queries.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;

use docusphere_core::config::DashboardConfig;
use docusphere_core::result::AppResult;
use docusphere_database::store::{FileStore, FolderStore, HistoryStore, LoginAttemptStore};
use docusphere_entity::history::HistoryAction;

use super::calc::{self, ActivityPoint, LoginChart, Statistics, StoragePoint};

const STORAGE_MONTHS: u32 = 12;
const CHART_DAYS: u64 = 7;
const TOP_BROWSERS: i64 = 5;

/// Read-only aggregates for the dashboard.
#[derive(Clone)]
pub struct StatisticsService {
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    history: Arc<dyn HistoryStore>,
    logins: Arc<dyn LoginAttemptStore>,
    config: DashboardConfig,
}

impl std::fmt::Debug for StatisticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsService")
            .field("config", &self.config)
            .finish()
    }
}

impl StatisticsService {
    /// Creates a new statistics service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        history: Arc<dyn HistoryStore>,
        logins: Arc<dyn LoginAttemptStore>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            files,
            folders,
            history,
            logins,
            config,
        }
    }

    /// Global counters.
    pub async fn statistics(&self) -> AppResult<Statistics> {
        let since = Utc::now() - Duration::hours(24);
        let (total_files, total_folders, total_storage, file_types, usage, active_users) = tokio::try_join!(
            self.files.count(),
            self.folders.count(),
            self.files.total_size(),
            self.files.count_by_mime(),
            self.files.usage_by_owner(),
            self.history.count_actors_since(since),
        )?;

        Ok(calc::statistics(
            total_files,
            total_folders,
            total_storage,
            self.config.storage_limit_bytes,
            file_types,
            usage,
            active_users,
        ))
    }

    /// Bytes uploaded per month over the last 12 months.
    pub async fn storage_chart(&self) -> AppResult<Vec<StoragePoint>> {
        let today = Utc::now().date_naive();
        let mut points = Vec::with_capacity(STORAGE_MONTHS as usize);
        for (start, end) in calc::month_windows(today, STORAGE_MONTHS) {
            let bytes = self
                .files
                .size_created_between(calc::day_start(start), calc::day_start(end))
                .await?;
            points.push(calc::storage_point(start, bytes));
        }
        Ok(points)
    }

    /// Uploads and downloads per day over the last 7 days.
    pub async fn activity_chart(&self) -> AppResult<Vec<ActivityPoint>> {
        let today = Utc::now().date_naive();
        let mut points = Vec::with_capacity(CHART_DAYS as usize);
        for date in calc::day_windows(today, CHART_DAYS) {
            let from = calc::day_start(date);
            let to = from + Duration::days(1);
            let (uploads, downloads) = tokio::try_join!(
                self.history.count_action_between(HistoryAction::Upload, from, to),
                self.history.count_action_between(HistoryAction::Download, from, to),
            )?;
            points.push(calc::activity_point(date, uploads, downloads));
        }
        Ok(points)
    }

    /// Login outcomes, browsers and locations over the last 7 days.
    pub async fn login_chart(&self) -> AppResult<LoginChart> {
        let days = calc::day_windows(Utc::now().date_naive(), CHART_DAYS);
        let since = days
            .first()
            .copied()
            .map(calc::day_start)
            .unwrap_or_else(Utc::now);

        let (attempts, browsers) = tokio::try_join!(
            self.logins.find_since(since),
            self.logins.top_browsers(TOP_BROWSERS),
        )?;
        debug!(attempts = attempts.len(), "Building login chart");

        Ok(calc::login_chart(
            &attempts,
            &days,
            &self.config.default_country,
            browsers,
        ))
    }
}
