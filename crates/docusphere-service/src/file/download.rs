//! Delivery URLs for downloads and previews.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use docusphere_auth::AccessEvaluator;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{AssetStore, AssetUrlOptions};
use docusphere_database::store::FileStore;
use docusphere_entity::file::File;
use docusphere_entity::history::{HistoryAction, TargetType};

use crate::context::RequestContext;
use crate::history::HistoryRecorder;

const THUMBNAIL_SIZE: u32 = 150;
const MEDIUM_SIZE: u32 = 500;
const LARGE_WIDTH: u32 = 1024;

/// A download URL for a file.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    /// URL delivering the file as an attachment.
    pub url: String,
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
}

/// Preview URLs for a file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePreview {
    /// URL of the original.
    pub url: String,
    /// MIME type.
    pub mime_type: String,
    /// 150x150 cropped image variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// 500x500 image variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// 1024 wide image variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    /// First page of a PDF rendered as an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Builds delivery URLs and records downloads and previews.
#[derive(Clone)]
pub struct DownloadService {
    files: Arc<dyn FileStore>,
    assets: Arc<dyn AssetStore>,
    access: AccessEvaluator,
    history: HistoryRecorder,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService")
            .field("assets", &self.assets.provider_type())
            .finish()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        files: Arc<dyn FileStore>,
        assets: Arc<dyn AssetStore>,
        history: HistoryRecorder,
    ) -> Self {
        Self {
            files,
            assets,
            access: AccessEvaluator::new(),
            history,
        }
    }

    async fn visible(&self, ctx: &RequestContext, id: Uuid) -> AppResult<File> {
        self.files
            .find(id, self.access.view_scope(ctx))
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Attachment URL for a visible file.
    pub async fn download(&self, ctx: &RequestContext, id: Uuid) -> AppResult<DownloadLink> {
        let file = self.visible(ctx, id).await?;
        let url = self
            .assets
            .url(&file.asset_id, &AssetUrlOptions::download())
            .await?;

        self.history
            .record(
                ctx,
                HistoryAction::Download,
                TargetType::File,
                id,
                format!("Downloaded \"{}\"", file.name),
                Some(json!({ "size": file.size })),
            )
            .await;
        Ok(DownloadLink {
            url,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size,
        })
    }

    /// Preview URLs for a visible file. Images get resized variants, PDFs
    /// a rendering of their first page.
    pub async fn preview(&self, ctx: &RequestContext, id: Uuid) -> AppResult<FilePreview> {
        let file = self.visible(ctx, id).await?;
        let url = self
            .assets
            .url(&file.asset_id, &AssetUrlOptions::original())
            .await?;
        let mut preview = FilePreview {
            url,
            mime_type: file.mime_type.clone(),
            thumbnail: None,
            medium: None,
            large: None,
            preview_url: None,
        };

        if file.is_image() {
            let large = AssetUrlOptions {
                width: Some(LARGE_WIDTH),
                crop: Some("fit".to_string()),
                ..AssetUrlOptions::default()
            };
            preview.thumbnail = Some(
                self.assets
                    .url(
                        &file.asset_id,
                        &AssetUrlOptions::resized(THUMBNAIL_SIZE, THUMBNAIL_SIZE, "fill"),
                    )
                    .await?,
            );
            preview.medium = Some(
                self.assets
                    .url(
                        &file.asset_id,
                        &AssetUrlOptions::resized(MEDIUM_SIZE, MEDIUM_SIZE, "fit"),
                    )
                    .await?,
            );
            preview.large = Some(self.assets.url(&file.asset_id, &large).await?);
        } else if file.is_pdf() {
            preview.preview_url = Some(
                self.assets
                    .url(&file.asset_id, &AssetUrlOptions::page(1))
                    .await?,
            );
        }

        self.history
            .record(
                ctx,
                HistoryAction::Preview,
                TargetType::File,
                id,
                format!("Previewed \"{}\"", file.name),
                None,
            )
            .await;
        Ok(preview)
    }
}
