//! Pure computations behind the dashboard.
//!
//! Everything here works on already fetched rows and an explicit "today" so
//! the results are deterministic. Empty input yields zeroed output.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docusphere_database::store::{BrowserCount, FileTypeCount, OwnerUsage};
use docusphere_entity::login::LoginAttempt;
use docusphere_entity::post::AuthorEngagement;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const LIKE_WEIGHT: f64 = 0.5;
const COMMENT_WEIGHT: f64 = 0.3;
const LOCATION_TARGET: f64 = 10.0;
const DEVICE_TARGET: f64 = 5.0;

/// Global counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_files: i64,
    pub total_folders: i64,
    /// Bytes stored.
    pub total_storage: i64,
    /// Configured quota in bytes.
    pub storage_limit: u64,
    pub storage_usage_percentage: f64,
    /// File count per MIME type.
    pub file_types: BTreeMap<String, i64>,
    /// Bytes per owner account ID.
    pub user_storage: BTreeMap<Uuid, i64>,
    /// Distinct history actors in the last 24 hours.
    pub active_users: i64,
}

/// Bytes uploaded in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePoint {
    /// First day of the month.
    pub start: NaiveDate,
    /// Short month name.
    pub month: String,
    pub bytes: i64,
    /// `bytes` in GiB, 2 decimals.
    pub storage_gb: f64,
}

/// Uploads and downloads on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    /// Short weekday name.
    pub day: String,
    pub uploads: i64,
    pub downloads: i64,
}

/// Login outcomes on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDay {
    pub date: NaiveDate,
    pub successful: i64,
    pub failed: i64,
    pub total: i64,
}

/// Share of the day's attempts per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDay {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub shares: BTreeMap<String, f64>,
}

/// Login dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginChart {
    pub login_attempts: Vec<LoginDay>,
    pub browser_stats: Vec<BrowserCount>,
    pub location_data: Vec<LocationDay>,
    pub locations: Vec<String>,
    pub success_rate: f64,
    pub location_diversity: f64,
    pub verified_devices: f64,
}

/// An author ranked by engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopAuthor {
    pub author_id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub engagement_score: f64,
}

/// Round to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Midnight UTC at the start of `date`.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Percentage of `limit` used, 2 decimals. Zero when there is no limit.
pub fn usage_percentage(used: i64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    round2(used as f64 / limit as f64 * 100.0)
}

/// Assemble the global counters.
pub fn statistics(
    total_files: i64,
    total_folders: i64,
    total_storage: i64,
    storage_limit: u64,
    file_types: Vec<FileTypeCount>,
    usage: Vec<OwnerUsage>,
    active_users: i64,
) -> Statistics {
    Statistics {
        total_files,
        total_folders,
        total_storage,
        storage_limit,
        storage_usage_percentage: usage_percentage(total_storage, storage_limit),
        file_types: file_types.into_iter().map(|t| (t.mime_type, t.count)).collect(),
        user_storage: usage.into_iter().map(|u| (u.owner_id, u.bytes)).collect(),
        active_users,
    }
}

/// `[start, end)` of the last `count` calendar months, oldest first,
/// ending with the month containing `today`.
pub fn month_windows(today: NaiveDate, count: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let this_month = today.with_day(1).unwrap_or(today);
    (0..count)
        .rev()
        .filter_map(|back| {
            let start = this_month.checked_sub_months(Months::new(back))?;
            let end = start.checked_add_months(Months::new(1))?;
            Some((start, end))
        })
        .collect()
}

/// The last `count` days, oldest first, ending with `today`.
pub fn day_windows(today: NaiveDate, count: u64) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// A storage chart point.
pub fn storage_point(start: NaiveDate, bytes: i64) -> StoragePoint {
    StoragePoint {
        start,
        month: start.format("%b").to_string(),
        bytes,
        storage_gb: round2(bytes as f64 / GIB),
    }
}

/// An activity chart point.
pub fn activity_point(date: NaiveDate, uploads: i64, downloads: i64) -> ActivityPoint {
    ActivityPoint {
        date,
        day: date.format("%a").to_string(),
        uploads,
        downloads,
    }
}

/// Aggregate login attempts over `days`.
///
/// Attempts outside `days` are ignored. Attempts without a country count
/// towards `default_country`.
pub fn login_chart(
    attempts: &[LoginAttempt],
    days: &[NaiveDate],
    default_country: &str,
    browser_stats: Vec<BrowserCount>,
) -> LoginChart {
    let in_window: Vec<&LoginAttempt> = attempts
        .iter()
        .filter(|a| days.contains(&a.created_at.date_naive()))
        .collect();
    let country = |a: &LoginAttempt| -> String {
        a.country
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_country.to_string())
    };

    let locations: Vec<String> = in_window
        .iter()
        .map(|&a| country(a))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut login_attempts = Vec::with_capacity(days.len());
    let mut location_data = Vec::with_capacity(days.len());
    for &date in days {
        let todays: Vec<&LoginAttempt> = in_window
            .iter()
            .copied()
            .filter(|a| a.created_at.date_naive() == date)
            .collect();
        let successful = todays.iter().filter(|a| a.success).count() as i64;
        let total = todays.len() as i64;
        login_attempts.push(LoginDay {
            date,
            successful,
            failed: total - successful,
            total,
        });

        let shares = locations
            .iter()
            .map(|loc| {
                let hits = todays.iter().filter(|a| country(a) == *loc).count();
                let share = if total == 0 {
                    0.0
                } else {
                    hits as f64 / total as f64
                };
                (loc.clone(), share)
            })
            .collect();
        location_data.push(LocationDay { date, shares });
    }

    let total = in_window.len();
    let successful = in_window.iter().filter(|a| a.success).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        round2(successful as f64 / total as f64 * 100.0)
    };
    let devices: BTreeSet<&str> = in_window
        .iter()
        .filter(|a| a.success)
        .map(|a| a.device.as_str())
        .collect();

    LoginChart {
        login_attempts,
        browser_stats,
        location_data,
        success_rate,
        location_diversity: round2(locations.len() as f64 / LOCATION_TARGET * 100.0).min(100.0),
        verified_devices: round2(devices.len() as f64 / DEVICE_TARGET * 100.0).min(100.0),
        locations,
    }
}

/// posts + 0.5 x likes + 0.3 x comments, 2 decimals.
pub fn engagement_score(posts: i64, likes: i64, comments: i64) -> f64 {
    round2(posts as f64 + LIKE_WEIGHT * likes as f64 + COMMENT_WEIGHT * comments as f64)
}

/// Rank authors by engagement score, best first.
pub fn rank_authors(rows: Vec<AuthorEngagement>, limit: usize) -> Vec<TopAuthor> {
    let mut ranked: Vec<TopAuthor> = rows
        .into_iter()
        .map(|row| TopAuthor {
            engagement_score: engagement_score(row.total_posts, row.total_likes, row.total_comments),
            author_id: row.author_id,
            name: if row.author_name.trim().is_empty() {
                "Unknown user".to_string()
            } else {
                row.author_name
            },
            avatar: row.author_avatar,
            total_posts: row.total_posts,
            total_likes: row.total_likes,
            total_comments: row.total_comments,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.engagement_score
            .total_cmp(&a.engagement_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attempt(day: NaiveDate, success: bool, country: Option<&str>, device: &str) -> LoginAttempt {
        LoginAttempt {
            id: Uuid::new_v4(),
            account_id: None,
            email: "a@b.io".to_string(),
            ip_address: "10.0.0.1".to_string(),
            user_agent: String::new(),
            browser: "Chrome".to_string(),
            os: "Linux".to_string(),
            device: device.to_string(),
            country: country.map(str::to_string),
            success,
            failure_reason: None,
            created_at: Utc
                .with_ymd_and_hms(day.year(), day.month(), day.day(), 9, 30, 0)
                .unwrap(),
        }
    }

    fn author(name: &str, posts: i64, likes: i64, comments: i64) -> AuthorEngagement {
        AuthorEngagement {
            author_id: Uuid::new_v4(),
            author_name: name.to_string(),
            author_avatar: None,
            total_posts: posts,
            total_likes: likes,
            total_comments: comments,
        }
    }

    #[test]
    fn test_engagement_ranking() {
        assert_eq!(engagement_score(2, 10, 5), 8.5);
        assert_eq!(engagement_score(5, 0, 0), 5.0);

        let ranked = rank_authors(vec![author("B", 5, 0, 0), author("A", 2, 10, 5)], 5);
        assert_eq!(ranked[0].name, "A");
        assert_eq!(ranked[1].name, "B");
    }

    #[test]
    fn test_rank_authors_limits_and_names_unknowns() {
        let rows = (0..7).map(|i| author(&format!("a{i}"), i, 0, 0)).collect();
        let ranked = rank_authors(rows, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].total_posts, 6);

        let ranked = rank_authors(vec![author(" ", 1, 1, 1)], 5);
        assert_eq!(ranked[0].name, "Unknown user");
        assert_eq!(ranked[0].engagement_score, 1.8);
    }

    #[test]
    fn test_usage_percentage() {
        let mib = 1024 * 1024;
        assert_eq!(usage_percentage(100 * mib, 175 * mib as u64), 57.14);
        assert_eq!(usage_percentage(10, 0), 0.0);
        assert_eq!(usage_percentage(0, 175), 0.0);
    }

    #[test]
    fn test_month_windows_cross_year() {
        let windows = month_windows(date(2024, 2, 17), 12);
        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0], (date(2023, 3, 1), date(2023, 4, 1)));
        assert_eq!(windows[11], (date(2024, 2, 1), date(2024, 3, 1)));
        assert_eq!(storage_point(windows[0].0, 0).month, "Mar");
    }

    #[test]
    fn test_storage_point_in_gib() {
        let point = storage_point(date(2024, 1, 1), 3 * 1024 * 1024 * 1024 / 2);
        assert_eq!(point.storage_gb, 1.5);
    }

    #[test]
    fn test_day_windows() {
        let days = day_windows(date(2024, 3, 2), 7);
        assert_eq!(days.first(), Some(&date(2024, 2, 25)));
        assert_eq!(days.last(), Some(&date(2024, 3, 2)));
        assert_eq!(activity_point(date(2024, 3, 2), 1, 2).day, "Sat");
    }

    #[test]
    fn test_login_success_rate() {
        let days = day_windows(date(2024, 3, 7), 7);
        let mut attempts: Vec<LoginAttempt> = (0..8)
            .map(|i| attempt(days[i % 7], true, None, "desktop"))
            .collect();
        attempts.push(attempt(days[0], false, None, "desktop"));
        attempts.push(attempt(days[6], false, None, "desktop"));

        let chart = login_chart(&attempts, &days, "Sénégal", Vec::new());
        assert_eq!(chart.success_rate, 80.0);
        assert_eq!(chart.login_attempts.len(), 7);
        assert_eq!(chart.login_attempts[0].successful, 2);
        assert_eq!(chart.login_attempts[0].failed, 1);
        assert_eq!(chart.login_attempts[0].total, 3);
    }

    #[test]
    fn test_login_locations_and_devices() {
        let days = day_windows(date(2024, 3, 7), 7);
        let today = days[6];
        let attempts = vec![
            attempt(today, true, None, "desktop"),
            attempt(today, true, Some("France"), "mobile"),
            attempt(today, false, Some("France"), "tablet"),
            attempt(today, true, Some("Mali"), "mobile"),
            // Outside the window.
            attempt(date(2024, 2, 1), true, Some("Japan"), "tablet"),
        ];

        let chart = login_chart(&attempts, &days, "Sénégal", Vec::new());
        assert_eq!(chart.locations, vec!["France", "Mali", "Sénégal"]);
        assert_eq!(chart.location_diversity, 30.0);
        assert_eq!(chart.verified_devices, 40.0);

        let shares = &chart.location_data[6].shares;
        assert_eq!(shares["France"], 0.5);
        assert_eq!(shares["Sénégal"], 0.25);
        assert_eq!(chart.location_data[0].shares["France"], 0.0);
    }

    #[test]
    fn test_empty_login_chart_is_zeroed() {
        let days = day_windows(date(2024, 3, 7), 7);
        let chart = login_chart(&[], &days, "Sénégal", Vec::new());
        assert_eq!(chart.success_rate, 0.0);
        assert!(chart.locations.is_empty());
        assert_eq!(chart.location_diversity, 0.0);
        assert!(chart.login_attempts.iter().all(|d| d.total == 0));
    }

    #[test]
    fn test_statistics_maps() {
        let owner = Uuid::new_v4();
        let stats = statistics(
            2,
            1,
            300,
            1000,
            vec![FileTypeCount {
                mime_type: "application/pdf".to_string(),
                count: 2,
            }],
            vec![OwnerUsage {
                owner_id: owner,
                owner_name: "Awa".to_string(),
                bytes: 300,
            }],
            1,
        );
        assert_eq!(stats.storage_usage_percentage, 30.0);
        assert_eq!(stats.file_types["application/pdf"], 2);
        assert_eq!(stats.user_storage[&owner], 300);
    }
}
