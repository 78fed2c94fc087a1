use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PostStore;
use crate::error::Result;
use crate::models::{AuthorPostCount, NewPost, Post, PostQuery, RecencyOrder};

const FIND_NEWEST_FIRST: &str = r#"
    SELECT id, content, author_id, created_at
    FROM posts
    WHERE ($1::text IS NULL OR author_id = $1)
    ORDER BY created_at DESC, id DESC
    LIMIT $2
"#;

const FIND_OLDEST_FIRST: &str = r#"
    SELECT id, content, author_id, created_at
    FROM posts
    WHERE ($1::text IS NULL OR author_id = $1)
    ORDER BY created_at ASC, id ASC
    LIMIT $2
"#;

/// PostgreSQL-backed post store
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let sql = match query.order {
            RecencyOrder::NewestFirst => FIND_NEWEST_FIRST,
            RecencyOrder::OldestFirst => FIND_OLDEST_FIRST,
        };

        let posts = sqlx::query_as::<_, Post>(sql)
            .bind(query.author_id.as_deref())
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (content, author_id)
            VALUES ($1, $2)
            RETURNING id, content, author_id, created_at
            "#,
        )
        .bind(&new_post.content)
        .bind(&new_post.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_unique(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, author_id, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, post_id: Uuid, author_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(post_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn group_by_author_with_count(&self, limit: i64) -> Result<Vec<AuthorPostCount>> {
        let rows = sqlx::query_as::<_, AuthorPostCount>(
            r#"
            SELECT author_id, COUNT(*) AS post_count
            FROM (
                SELECT author_id, created_at
                FROM posts
                ORDER BY created_at DESC
                LIMIT $1
            ) recent
            GROUP BY author_id
            ORDER BY post_count DESC, MAX(created_at) DESC
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
