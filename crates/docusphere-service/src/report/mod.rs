//! Dashboard aggregates.

pub mod calc;
pub mod statistics;

pub use calc::{
    ActivityPoint, LocationDay, LoginChart, LoginDay, Statistics, StoragePoint, TopAuthor,
};
pub use statistics::StatisticsService;
