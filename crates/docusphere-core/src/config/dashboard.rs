//! Reporting configuration.

use serde::{Deserialize, Serialize};

/// Settings for the statistics and chart endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Storage quota used for the usage percentage (default 175 MiB).
    #[serde(default = "default_storage_limit")]
    pub storage_limit_bytes: u64,
    /// Country reported for login attempts without one.
    #[serde(default = "default_country")]
    pub default_country: String,
    /// Number of entries in the top authors ranking.
    #[serde(default = "default_top_authors")]
    pub top_authors_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_limit_bytes: default_storage_limit(),
            default_country: default_country(),
            top_authors_limit: default_top_authors(),
        }
    }
}

fn default_storage_limit() -> u64 {
    175 * 1024 * 1024
}

fn default_country() -> String {
    "Sénégal".to_string()
}

fn default_top_authors() -> usize {
    5
}
