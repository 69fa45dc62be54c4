//! Post Service
//!
//! CRUD over the post store. The list read goes through the cache under
//! [`CacheKey::Posts`]; every successful write invalidates both the list and
//! the stats snapshot. Single-post reads always hit the store.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{
    cache_aside, invalidate, CacheClient, CacheKey, JsonSnapshot, WRITE_INVALIDATES,
};
use crate::error::{AppError, Result};
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::store::PostStore;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    cache: Arc<dyn CacheClient>,
    list_ttl: Duration,
}

impl PostService {
    pub fn new(
        store: Arc<dyn PostStore>,
        cache: Arc<dyn CacheClient>,
        list_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            list_ttl,
        }
    }

    /// All posts newest first, as the JSON array held in the cache.
    pub async fn list(&self) -> Result<JsonSnapshot> {
        let store = self.store.clone();
        cache_aside(self.cache.as_ref(), CacheKey::Posts, self.list_ttl, || async move {
            store.list_posts().await
        })
        .await
    }

    pub async fn get(&self, id: i32) -> Result<Post> {
        self.store.find_post(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, request: CreatePostRequest) -> Result<Post> {
        let new_post = request.validate()?;
        let post = self.store.insert_post(&new_post).await?;

        invalidate(self.cache.as_ref(), &WRITE_INVALIDATES).await;
        info!(id = post.id, author = %post.author, "Post created");

        Ok(post)
    }

    pub async fn update(&self, id: i32, request: UpdatePostRequest) -> Result<Post> {
        let changes = request.validate()?;
        let post = self
            .store
            .update_post(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        invalidate(self.cache.as_ref(), &WRITE_INVALIDATES).await;
        info!(id, "Post updated");

        Ok(post)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.store.delete_post(id).await? {
            return Err(not_found(id));
        }

        invalidate(self.cache.as_ref(), &WRITE_INVALIDATES).await;
        info!(id, "Post deleted");

        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Post {} not found", id))
}
