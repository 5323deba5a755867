//! File operations: metadata, sharing, upload and delivery.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{DownloadLink, DownloadService, FilePreview};
pub use service::{FileService, SharedFiles};
pub use upload::{UploadRequest, UploadService};
