//! Activity history.

pub mod recorder;

pub use recorder::{HistoryRecorder, RecordRequest};
