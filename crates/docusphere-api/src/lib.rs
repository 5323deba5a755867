//! # docusphere-api
//!
//! HTTP API layer for Docusphere built on Axum.
//!
//! Provides the REST endpoints under `/api`, the local asset file server,
//! middleware (request logging, CORS, compression), extractors, DTOs and
//! the mapping from domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
