//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::snapshot::OwnerSnapshot;

/// A post in the community feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Author account ID.
    pub author_id: Uuid,
    /// Author display name at creation time.
    pub author_name: String,
    /// Author avatar at creation time.
    pub author_avatar: Option<String>,
    /// Attached files.
    pub files: Json<Vec<PostAttachment>>,
    /// Tags.
    pub tags: Vec<String>,
    /// Accounts that like the post.
    pub likes: Vec<Uuid>,
    /// Embedded comments, oldest first.
    pub comments: Json<Vec<Comment>>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check whether the account likes the post.
    pub fn is_liked_by(&self, account_id: Uuid) -> bool {
        self.likes.contains(&account_id)
    }
}

/// A comment embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier, unique within the post.
    pub id: Uuid,
    /// Body.
    pub content: String,
    /// Author snapshot.
    pub author: OwnerSnapshot,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
}

/// A file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAttachment {
    /// Original file name.
    pub name: String,
    /// Delivery URL.
    pub url: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Asset id in the asset store.
    pub asset_id: String,
}

/// Data required to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Author snapshot.
    pub author: OwnerSnapshot,
    /// Attachments.
    pub files: Vec<PostAttachment>,
    /// Tags.
    pub tags: Vec<String>,
}

/// Partial post update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

/// Per-author totals used by the engagement ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuthorEngagement {
    /// Author account ID.
    pub author_id: Uuid,
    /// Author display name (from the oldest post).
    pub author_name: String,
    /// Author avatar (from the oldest post).
    pub author_avatar: Option<String>,
    /// Number of posts written.
    pub total_posts: i64,
    /// Likes received across all posts.
    pub total_likes: i64,
    /// Comments received across all posts.
    pub total_comments: i64,
}
