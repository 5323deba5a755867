//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use docusphere_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized and passed its validation rules.
///
/// Malformed bodies and rule violations both become 400 responses with
/// the standard error body.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

/// Flatten validation errors into `{field: message}`.
fn field_details(errors: &ValidationErrors) -> Value {
    let mut details = Map::new();
    for (field, errs) in errors.field_errors() {
        let message = errs
            .first()
            .and_then(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{field} is invalid"));
        details.insert(field.to_string(), Value::String(message));
    }
    Value::Object(details)
}

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value.validate().map_err(|errors| {
            AppError::validation("Request validation failed").with_details(field_details(&errors))
        })?;

        Ok(ValidJson(value))
    }
}
