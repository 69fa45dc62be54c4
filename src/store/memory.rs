//! In-process post store.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{PostStore, SAMPLE_POSTS};
use crate::error::Result;
use crate::models::{NewPost, Post, PostChanges, PostCounts};

#[derive(Debug, Default)]
struct Rows {
    next_id: i32,
    posts: BTreeMap<i32, Post>,
}

/// Post store kept in memory. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    rows: RwLock<Rows>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the sample posts.
    pub async fn seeded() -> Self {
        let store = Self::new();
        for (title, content, author) in SAMPLE_POSTS {
            let post = NewPost {
                title: title.to_string(),
                content: content.to_string(),
                author: author.to_string(),
            };
            // Inserting into a fresh in-memory store cannot fail
            let _ = store.insert_post(&post).await;
        }
        store
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    async fn find_post(&self, id: i32) -> Result<Option<Post>> {
        Ok(self.rows.read().await.posts.get(&id).cloned())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        let mut rows = self.rows.write().await;
        rows.next_id += 1;
        let now = Utc::now();
        let inserted = Post {
            id: rows.next_id,
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.posts.insert(inserted.id, inserted.clone());
        Ok(inserted)
    }

    async fn update_post(&self, id: i32, changes: &PostChanges) -> Result<Option<Post>> {
        let mut rows = self.rows.write().await;
        Ok(rows.posts.get_mut(&id).map(|post| {
            post.title = changes.title.clone();
            post.content = changes.content.clone();
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: i32) -> Result<bool> {
        Ok(self.rows.write().await.posts.remove(&id).is_some())
    }

    async fn count_posts(&self) -> Result<PostCounts> {
        let rows = self.rows.read().await;
        let authors: HashSet<&str> = rows.posts.values().map(|p| p.author.as_str()).collect();
        Ok(PostCounts {
            total_posts: rows.posts.len() as i64,
            total_authors: authors.len() as i64,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}
