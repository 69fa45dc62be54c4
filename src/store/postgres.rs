//! PostgreSQL-backed post store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use super::{PostStore, SAMPLE_POSTS};
use crate::config::Config;
use crate::error::Result;
use crate::models::{NewPost, Post, PostChanges, PostCounts};

const POST_COLUMNS: &str = "id, title, content, author, created_at, updated_at";

/// Post store over a sqlx connection pool.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    /// Builds a lazily connecting pool so startup does not depend on the
    /// database being up. Fails only on a malformed URL.
    pub fn connect_lazy(database_url: &str, config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .idle_timeout(config.db_idle_timeout)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Creates the posts table and indexes, then seeds an empty table.
    pub async fn init_schema(&self, seed: bool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id SERIAL PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                author VARCHAR(100) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC)")
            .execute(&self.pool)
            .await?;

        if seed && self.count_posts().await?.total_posts == 0 {
            for (title, content, author) in SAMPLE_POSTS {
                sqlx::query("INSERT INTO posts (title, content, author) VALUES ($1, $2, $3)")
                    .bind(title)
                    .bind(content)
                    .bind(author)
                    .execute(&self.pool)
                    .await?;
            }
            info!(count = SAMPLE_POSTS.len(), "Inserted sample posts");
        }

        Ok(())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_post(&self, id: i32) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        let inserted = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content, author) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update_post(&self, id: i32, changes: &PostChanges) -> Result<Option<Post>> {
        let updated = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = $1, content = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_post(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_posts(&self) -> Result<PostCounts> {
        let (total_posts, total_authors) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(DISTINCT author) FROM posts",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PostCounts {
            total_posts,
            total_authors,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Store pool closed");
    }
}
