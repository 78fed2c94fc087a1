/// Database access layer for emoji-feed-service
///
/// `PostStore` is the seam between the services and PostgreSQL; handlers and
/// services only ever see the trait.
pub mod post_repo;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AuthorPostCount, NewPost, Post, PostQuery};

pub use post_repo::PgPostStore;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts matching `query`, ordered by `created_at`, at most `query.limit`
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>>;

    async fn create(&self, new_post: NewPost) -> Result<Post>;

    async fn find_unique(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Delete by compound key. Returns whether a row was removed; deleting a
    /// missing row is not an error.
    async fn delete(&self, post_id: Uuid, author_id: &str) -> Result<bool>;

    /// Post counts per author over the `limit` most recent posts, highest
    /// count first, ties by most recent activity.
    async fn group_by_author_with_count(&self, limit: i64) -> Result<Vec<AuthorPostCount>>;
}
