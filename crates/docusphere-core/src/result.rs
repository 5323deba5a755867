//! Convenience result type alias for Docusphere.

use crate::error::AppError;

/// A specialized `Result` type for Docusphere operations.
pub type AppResult<T> = Result<T, AppError>;
