//! Posts, comments, likes and post attachments.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{AssetStore, AssetUpload};
use docusphere_database::store::PostStore;
use docusphere_entity::post::{Comment, CreatePost, Post, PostAttachment, UpdatePost};

use crate::context::RequestContext;
use crate::file::upload::resolve_mime_type;
use crate::report::calc::{TopAuthor, rank_authors};

/// MIME types accepted as post attachments.
const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/markdown",
];

/// Whether a MIME type may be attached to a post.
pub fn is_allowed_attachment(mime_type: &str) -> bool {
    ALLOWED_ATTACHMENT_TYPES.contains(&mime_type)
}

/// New post input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Attachments uploaded beforehand.
    #[serde(default)]
    pub files: Vec<PostAttachment>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Community feed operations.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    assets: Arc<dyn AssetStore>,
    max_attachment_size: u64,
    top_authors_limit: usize,
}

impl std::fmt::Debug for PostService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostService")
            .field("max_attachment_size", &self.max_attachment_size)
            .field("top_authors_limit", &self.top_authors_limit)
            .finish()
    }
}

fn not_found() -> AppError {
    AppError::not_found("Post not found")
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        let message = format!("{field} is required");
        let mut details = serde_json::Map::new();
        details.insert(field.to_string(), message.clone().into());
        return Err(AppError::validation(message).with_details(details.into()));
    }
    Ok(value.to_string())
}

impl PostService {
    /// Creates a new post service.
    pub fn new(
        posts: Arc<dyn PostStore>,
        assets: Arc<dyn AssetStore>,
        max_attachment_size: u64,
        top_authors_limit: usize,
    ) -> Self {
        Self {
            posts,
            assets,
            max_attachment_size,
            top_authors_limit,
        }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> AppResult<Vec<Post>> {
        self.posts.list().await
    }

    /// A single post.
    pub async fn get(&self, id: Uuid) -> AppResult<Post> {
        self.posts.find(id).await?.ok_or_else(not_found)
    }

    /// Publish a post as the caller.
    pub async fn create(&self, ctx: &RequestContext, req: CreatePostRequest) -> AppResult<Post> {
        let post = self
            .posts
            .create(&CreatePost {
                title: required("title", &req.title)?,
                content: required("content", &req.content)?,
                author: ctx.actor(),
                files: req.files,
                tags: req.tags,
            })
            .await?;
        info!(user_id = %ctx.account_id(), post_id = %post.id, "Post published");
        Ok(post)
    }

    /// Edit a post. Author only.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, req: UpdatePost) -> AppResult<Post> {
        let post = self.get(id).await?;
        if post.author_id != ctx.account_id() {
            return Err(AppError::forbidden("Only the author may edit this post"));
        }
        let update = UpdatePost {
            title: req.title.map(|t| required("title", &t)).transpose()?,
            content: req.content.map(|c| required("content", &c)).transpose()?,
            tags: req.tags,
        };
        self.posts.update(id, &update).await?.ok_or_else(not_found)
    }

    /// Delete a post. Author or Admin.
    ///
    /// Attachment references are client supplied, so the assets they name
    /// are left in the asset store.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let post = self.get(id).await?;
        if post.author_id != ctx.account_id() && !ctx.is_admin() {
            return Err(AppError::forbidden("Only the author or an admin may delete this post"));
        }
        if !self.posts.delete(id).await? {
            return Err(not_found());
        }
        info!(user_id = %ctx.account_id(), post_id = %id, "Post deleted");
        Ok(())
    }

    /// Append a comment and return it.
    pub async fn comment(&self, ctx: &RequestContext, id: Uuid, content: &str) -> AppResult<Comment> {
        let comment = Comment {
            id: Uuid::now_v7(),
            content: required("content", content)?,
            author: ctx.actor(),
            created_at: Utc::now(),
        };
        self.posts
            .push_comment(id, &comment)
            .await?
            .ok_or_else(not_found)?;
        Ok(comment)
    }

    /// Like the post, or remove the caller's like.
    pub async fn toggle_like(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Post> {
        self.posts
            .toggle_like(id, ctx.account_id())
            .await?
            .ok_or_else(not_found)
    }

    /// Store a file to attach to a post.
    pub async fn upload_attachment(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        mime_type: Option<&str>,
        data: Bytes,
    ) -> AppResult<PostAttachment> {
        let file_name = required("file", file_name)?;
        if data.len() as u64 > self.max_attachment_size {
            return Err(AppError::validation(format!(
                "Attachments are limited to {} bytes",
                self.max_attachment_size
            ))
            .with_details(json!({ "file": "File is too large" })));
        }
        let mime_type = resolve_mime_type(mime_type, &file_name);
        if !is_allowed_attachment(&mime_type) {
            return Err(AppError::validation(format!(
                "File type '{mime_type}' cannot be attached to a post"
            ))
            .with_details(json!({ "file": "File type not allowed" })));
        }

        let size = data.len() as i64;
        let stored = self
            .assets
            .upload(AssetUpload {
                file_name: file_name.clone(),
                mime_type: mime_type.clone(),
                data,
            })
            .await?;

        info!(user_id = %ctx.account_id(), asset_id = %stored.asset_id, "Post attachment stored");
        Ok(PostAttachment {
            name: file_name,
            url: stored.secure_url,
            mime_type,
            size,
            asset_id: stored.asset_id,
        })
    }

    /// Authors ranked by engagement.
    pub async fn top_authors(&self) -> AppResult<Vec<TopAuthor>> {
        let rows = self.posts.author_engagement().await?;
        Ok(rank_authors(rows, self.top_authors_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedAssetStore, context};
    use docusphere_core::error::ErrorKind;
    use docusphere_database::memory::MemoryPostStore;
    use docusphere_entity::account::AccountRole;

    const FIVE_MIB: u64 = 5 * 1024 * 1024;

    fn service() -> (PostService, Arc<FixedAssetStore>) {
        let assets = Arc::new(FixedAssetStore::default());
        let service = PostService::new(Arc::new(MemoryPostStore::new()), assets.clone(), FIVE_MIB, 5);
        (service, assets)
    }

    fn post(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: "Minutes of the weekly meeting".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_attachment_allowlist() {
        assert!(is_allowed_attachment("image/png"));
        assert!(is_allowed_attachment("text/markdown"));
        assert!(!is_allowed_attachment("application/zip"));
        assert!(!is_allowed_attachment("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_create_requires_title_and_content() {
        let (service, _) = service();
        let ctx = context(AccountRole::Viewer);
        let err = service
            .create(&ctx, CreatePostRequest {
                content: " ".to_string(),
                ..post("Hello")
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.details.unwrap().get("content").is_some());

        let created = service.create(&ctx, post("Hello")).await.unwrap();
        assert_eq!(created.author_id, ctx.account_id());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_and_delete_permissions() {
        let (service, _) = service();
        let author = context(AccountRole::Viewer);
        let other = context(AccountRole::Editor);
        let admin = context(AccountRole::Admin);
        let first = service.create(&author, post("First")).await.unwrap();
        let second = service.create(&author, post("Second")).await.unwrap();

        let edit = UpdatePost {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let err = service.update(&admin, first.id, edit.clone()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(service.update(&author, first.id, edit).await.unwrap().title, "Renamed");

        let err = service.delete(&other, first.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        service.delete(&author, first.id).await.unwrap();
        service.delete(&admin, second.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_and_like_toggle() {
        let (service, _) = service();
        let author = context(AccountRole::Viewer);
        let reader = context(AccountRole::Viewer);
        let created = service.create(&author, post("Hello")).await.unwrap();

        let comment = service.comment(&reader, created.id, " Nice ").await.unwrap();
        assert_eq!(comment.content, "Nice");
        assert_eq!(comment.author.id, reader.account_id());

        let liked = service.toggle_like(&reader, created.id).await.unwrap();
        assert!(liked.is_liked_by(reader.account_id()));
        let unliked = service.toggle_like(&reader, created.id).await.unwrap();
        assert!(unliked.likes.is_empty());
        assert_eq!(unliked.comments.len(), 1);

        let err = service.toggle_like(&reader, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_attachment_checks() {
        let (service, _) = service();
        let ctx = context(AccountRole::Viewer);

        let err = service
            .upload_attachment(&ctx, "tool.zip", Some("application/zip"), Bytes::from_static(b"PK"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let big = Bytes::from(vec![0u8; FIVE_MIB as usize + 1]);
        let err = service
            .upload_attachment(&ctx, "photo.png", None, big)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let attachment = service
            .upload_attachment(&ctx, "notes.md", Some("text/markdown"), Bytes::from_static(b"# hi"))
            .await
            .unwrap();
        assert_eq!(attachment.mime_type, "text/markdown");
        assert_eq!(attachment.size, 4);
    }

    #[tokio::test]
    async fn test_delete_leaves_referenced_assets_alone() {
        let (service, assets) = service();
        let owner = context(AccountRole::Viewer);
        let stranger = context(AccountRole::Viewer);
        let attachment = service
            .upload_attachment(&owner, "notes.txt", None, Bytes::from_static(b"hi"))
            .await
            .unwrap();

        // Someone else's post pointing at the same asset.
        let borrowed = service
            .create(&stranger, CreatePostRequest {
                files: vec![attachment.clone()],
                ..post("Borrowed")
            })
            .await
            .unwrap();
        service.delete(&stranger, borrowed.id).await.unwrap();

        let own = service
            .create(&owner, CreatePostRequest {
                files: vec![attachment],
                ..post("With file")
            })
            .await
            .unwrap();
        service.delete(&owner, own.id).await.unwrap();

        assert!(assets.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_authors() {
        let (service, _) = service();
        let prolific = context(AccountRole::Viewer);
        let liked = context(AccountRole::Viewer);
        for i in 0..3 {
            service.create(&prolific, post(&format!("P{i}"))).await.unwrap();
        }
        let star = service.create(&liked, post("Star")).await.unwrap();
        for _ in 0..6 {
            let fan = context(AccountRole::Viewer);
            service.toggle_like(&fan, star.id).await.unwrap();
        }

        let ranked = service.top_authors().await.unwrap();
        assert_eq!(ranked[0].author_id, liked.account_id());
        assert_eq!(ranked[0].engagement_score, 4.0);
        assert_eq!(ranked[1].engagement_score, 3.0);
    }
}
