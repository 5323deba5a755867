//! CORS layer for the browser client.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use docusphere_core::config::CorsConfig;

/// Parse every entry of `values`, skipping the ones that are not valid.
fn parsed<T: std::str::FromStr>(values: &[String]) -> Vec<T> {
    values.iter().filter_map(|v| v.parse().ok()).collect()
}

/// Build the CORS layer described by `config`.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parsed::<HeaderValue>(&config.allowed_origins))
    };
    let headers = if config.any_header() {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parsed::<HeaderName>(&config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(parsed::<Method>(&config.allowed_methods))
        .allow_headers(headers)
        .max_age(config.max_age())
}
