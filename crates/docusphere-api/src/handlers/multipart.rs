//! Reading multipart form fields.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use bytes::Bytes;
use uuid::Uuid;

use docusphere_core::error::AppError;

/// The binary part of an upload form.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Client-side file name.
    pub file_name: String,
    /// Announced content type.
    pub mime_type: Option<String>,
    /// Content.
    pub data: Bytes,
}

/// All fields of an upload form, keyed loosely.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// The `file` part.
    pub file: Option<FilePart>,
    /// Text fields in arrival order.
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    /// Text value of a field, ignoring blanks.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Optional UUID field.
    pub fn uuid(&self, name: &str) -> Result<Option<Uuid>, AppError> {
        self.text(name)
            .filter(|v| *v != "null")
            .map(|v| {
                Uuid::parse_str(v).map_err(|_| {
                    let mut details = serde_json::Map::new();
                    details.insert(name.to_string(), "Must be a UUID".into());
                    AppError::validation(format!("Invalid {name}")).with_details(details.into())
                })
            })
            .transpose()
    }

    /// Boolean field, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes"))
            .unwrap_or(false)
    }

    /// Tags given either as a JSON array or comma separated.
    pub fn tags(&self, name: &str) -> Vec<String> {
        let Some(raw) = self.text(name) else {
            return Vec::new();
        };
        if let Ok(tags) = serde_json::from_str::<Vec<String>>(raw) {
            return tags;
        }
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

fn malformed(err: MultipartError) -> AppError {
    AppError::validation(format!("Malformed multipart body: {}", err.body_text()))
}

async fn read_file(field: Field<'_>) -> Result<FilePart, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field.content_type().map(String::from);
    let data = field.bytes().await.map_err(malformed)?;
    Ok(FilePart {
        file_name,
        mime_type,
        data,
    })
}

/// Drain a multipart body.
pub async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            form.file = Some(read_file(field).await?);
        } else {
            let value = field.text().await.map_err(malformed)?;
            form.fields.push((name, value));
        }
    }
    Ok(form)
}

/// The `file` part, or a validation error naming it.
pub fn require_file(form: &mut UploadForm) -> Result<FilePart, AppError> {
    form.file.take().ok_or_else(|| {
        AppError::validation("No file uploaded")
            .with_details(serde_json::json!({ "file": "File is required" }))
    })
}
