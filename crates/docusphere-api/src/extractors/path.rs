//! Path parameter extractor with the standard error body.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use docusphere_core::error::AppError;

use crate::error::ApiError;

/// Path parameters that parsed, e.g. a resource id.
///
/// A malformed segment such as `/files/not-a-uuid` becomes a 400 with the
/// standard error body instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation("Invalid path parameter")
                    .with_details(serde_json::json!({ "path": rejection.body_text() }))
            })?;
        Ok(ValidPath(value))
    }
}
