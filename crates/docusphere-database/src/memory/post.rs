//! In-memory post store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use sqlx::types::Json;
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_entity::post::{AuthorEngagement, Comment, CreatePost, Post, UpdatePost};

use crate::store::PostStore;

/// Post store backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    posts: DashMap<Uuid, Post>,
}

impl MemoryPostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            title: data.title.clone(),
            content: data.content.clone(),
            author_id: data.author.id,
            author_name: data.author.name.clone(),
            author_avatar: data.author.avatar.clone(),
            files: Json(data.files.clone()),
            tags: data.tags.clone(),
            likes: Vec::new(),
            comments: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.value().clone()))
    }

    async fn list(&self) -> AppResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.value().clone()).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Option<Post>> {
        let Some(mut post) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &data.title {
            post.title = title.clone();
        }
        if let Some(content) = &data.content {
            post.content = content.clone();
        }
        if let Some(tags) = &data.tags {
            post.tags = tags.clone();
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn push_comment(&self, id: Uuid, comment: &Comment) -> AppResult<Option<Post>> {
        let Some(mut post) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.comments.0.push(comment.clone());
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn toggle_like(&self, id: Uuid, account: Uuid) -> AppResult<Option<Post>> {
        let Some(mut post) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        match post.likes.iter().position(|a| *a == account) {
            Some(index) => {
                post.likes.remove(index);
            }
            None => post.likes.push(account),
        }
        Ok(Some(post.clone()))
    }

    async fn author_engagement(&self) -> AppResult<Vec<AuthorEngagement>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.value().clone()).collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut by_author: HashMap<Uuid, AuthorEngagement> = HashMap::new();
        for post in posts {
            let row = by_author
                .entry(post.author_id)
                .or_insert_with(|| AuthorEngagement {
                    author_id: post.author_id,
                    author_name: post.author_name.clone(),
                    author_avatar: post.author_avatar.clone(),
                    total_posts: 0,
                    total_likes: 0,
                    total_comments: 0,
                });
            row.total_posts += 1;
            row.total_likes += post.likes.len() as i64;
            row.total_comments += post.comments.0.len() as i64;
        }
        Ok(by_author.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docusphere_entity::snapshot::OwnerSnapshot;

    fn author(id: Uuid) -> OwnerSnapshot {
        OwnerSnapshot {
            id,
            name: "Awa".to_string(),
            avatar: None,
        }
    }

    fn new_post(author_id: Uuid) -> CreatePost {
        CreatePost {
            title: "Quarterly report".to_string(),
            content: "Numbers are up".to_string(),
            author: author(author_id),
            files: Vec::new(),
            tags: vec!["finance".to_string()],
        }
    }

    #[tokio::test]
    async fn test_toggle_like_twice_restores_the_set() {
        let store = MemoryPostStore::new();
        let post = store.create(&new_post(Uuid::new_v4())).await.unwrap();
        let fan = Uuid::new_v4();

        let liked = store.toggle_like(post.id, fan).await.unwrap().unwrap();
        assert!(liked.is_liked_by(fan));
        let unliked = store.toggle_like(post.id, fan).await.unwrap().unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_like_toggles_keep_every_like() {
        let store = std::sync::Arc::new(MemoryPostStore::new());
        let post = store.create(&new_post(Uuid::new_v4())).await.unwrap();

        let fans: Vec<Uuid> = (0..64).map(|_| Uuid::new_v4()).collect();
        let handles: Vec<_> = fans
            .iter()
            .map(|&fan| {
                let store = store.clone();
                tokio::spawn(async move { store.toggle_like(post.id, fan).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let post = store.find(post.id).await.unwrap().unwrap();
        assert_eq!(post.likes.len(), fans.len());
        assert!(fans.iter().all(|fan| post.is_liked_by(*fan)));
    }

    #[tokio::test]
    async fn test_comments_append_in_order() {
        let store = MemoryPostStore::new();
        let post = store.create(&new_post(Uuid::new_v4())).await.unwrap();
        for content in ["first", "second"] {
            let comment = Comment {
                id: Uuid::now_v7(),
                content: content.to_string(),
                author: author(Uuid::new_v4()),
                created_at: Utc::now(),
            };
            store.push_comment(post.id, &comment).await.unwrap();
        }
        let post = store.find(post.id).await.unwrap().unwrap();
        let contents: Vec<&str> = post.comments.0.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_author_engagement() {
        let store = MemoryPostStore::new();
        let writer = Uuid::new_v4();
        let first = store.create(&new_post(writer)).await.unwrap();
        store.create(&new_post(writer)).await.unwrap();
        store.toggle_like(first.id, Uuid::new_v4()).await.unwrap();

        let rows = store.author_engagement().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_posts, 2);
        assert_eq!(rows[0].total_likes, 1);
        assert_eq!(rows[0].total_comments, 0);
    }

    #[tokio::test]
    async fn test_missing_post() {
        let store = MemoryPostStore::new();
        assert!(store.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap().is_none());
    }
}
