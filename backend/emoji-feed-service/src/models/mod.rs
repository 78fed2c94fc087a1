/// Data models for emoji-feed-service
///
/// - Post: an emoji-only post owned by the post store
/// - Author: display attributes resolved from the identity directory
/// - RankedEntry and its response shapes: derived per request, never stored
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Post as persisted in the `posts` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    /// Opaque user id issued by the identity provider
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// `posts.create` input
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    /// 1 to 250 emoji, nothing else
    #[validate(custom(function = "crate::services::graphemes::validate_emoji_content"))]
    pub content: String,
}

/// Data required to insert a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub author_id: String,
}

/// Sort direction on `created_at`, the `orderBy` half of the store's
/// `find` contract. Feeds and rankings only read `NewestFirst`; `OldestFirst`
/// is served by every `PostStore` for callers paging forward in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecencyOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Post lookup parameters for `PostStore::find`
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub author_id: Option<String>,
    pub order: RecencyOrder,
    pub limit: i64,
}

impl PostQuery {
    /// Most recent `limit` posts, optionally restricted to one author
    pub fn recent(author_id: Option<String>, limit: i64) -> Self {
        Self {
            author_id,
            order: RecencyOrder::NewestFirst,
            limit,
        }
    }
}

/// Row of `PostStore::group_by_author_with_count`
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorPostCount {
    pub author_id: String,
    pub post_count: i64,
}

/// User record as returned by the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    pub handle: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public author attributes attached to posts and profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub handle: String,
    pub avatar_url: String,
}

/// Post joined with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
}

/// One row of a top-N frequency ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub key: String,
    pub label: String,
    pub count: u64,
}

/// `posts.getMostUsedEmojis` item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmojiCount {
    pub emoji: String,
    pub count: u64,
}

impl From<RankedEntry> for EmojiCount {
    fn from(entry: RankedEntry) -> Self {
        Self {
            emoji: entry.label,
            count: entry.count,
        }
    }
}

/// `posts.getMostActiveUsers` item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    pub author_id: String,
    pub author_name: String,
    pub count: u64,
}

impl From<RankedEntry> for ActiveUser {
    fn from(entry: RankedEntry) -> Self {
        Self {
            author_id: entry.key,
            author_name: entry.label,
            count: entry.count,
        }
    }
}
