//! Query parameters for the history listing.

use serde::{Deserialize, Serialize};

use docusphere_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use docusphere_database::store::HistoryFilter;
use docusphere_entity::history::{HistoryAction, TargetType};

/// `?page=&limit=&type=&target=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Page number (1-based, default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 50, max: 200).
    pub limit: Option<u64>,
    /// Only entries with this action.
    #[serde(rename = "type")]
    pub action: Option<HistoryAction>,
    /// Only entries about this kind of resource.
    pub target: Option<TargetType>,
}

impl HistoryQuery {
    /// Converts to a clamped `PageRequest`.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// Converts to a store filter.
    pub fn filter(&self) -> HistoryFilter {
        HistoryFilter {
            action: self.action,
            target_type: self.target,
        }
    }
}
