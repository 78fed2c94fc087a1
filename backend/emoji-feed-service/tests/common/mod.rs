//! Test doubles for the post store and the identity directory
//!
//! Both fakes are in-memory and record how they were called so tests can
//! verify batching (one directory call per 100 authors) and compound-key deletes.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use emoji_feed_service::config::FeedConfig;
use emoji_feed_service::db::PostStore;
use emoji_feed_service::directory::UserDirectory;
use emoji_feed_service::error::{AppError, Result};
use emoji_feed_service::models::{
    AuthorPostCount, DirectoryUser, NewPost, Post, PostQuery, RecencyOrder,
};
use emoji_feed_service::services::FeedContext;

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/jwt_test_private.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/jwt_test_public.pem");

/// In-memory post store. Every inserted post is one second newer than the last.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: Mutex<Vec<Post>>,
    clock: Mutex<i64>,
    delete_calls: Mutex<Vec<(Uuid, String)>>,
}

impl InMemoryPostStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(*clock)
    }

    /// Seed a post directly, bypassing validation
    pub fn seed(&self, author_id: &str, content: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author_id: author_id.to_string(),
            created_at: self.next_timestamp(),
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn contains(&self, post_id: Uuid) -> bool {
        self.posts.lock().unwrap().iter().any(|p| p.id == post_id)
    }

    pub fn delete_calls(&self) -> Vec<(Uuid, String)> {
        self.delete_calls.lock().unwrap().clone()
    }

    fn newest_first(&self) -> Vec<Post> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .newest_first()
            .into_iter()
            .filter(|p| {
                query
                    .author_id
                    .as_deref()
                    .map_or(true, |author| p.author_id == author)
            })
            .collect();
        if query.order == RecencyOrder::OldestFirst {
            posts.reverse();
        }
        posts.truncate(query.limit.max(0) as usize);
        Ok(posts)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post> {
        Ok(self.seed(&new_post.author_id, &new_post.content))
    }

    async fn find_unique(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == post_id)
            .cloned())
    }

    async fn delete(&self, post_id: Uuid, author_id: &str) -> Result<bool> {
        self.delete_calls
            .lock()
            .unwrap()
            .push((post_id, author_id.to_string()));

        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| !(p.id == post_id && p.author_id == author_id));
        Ok(posts.len() < before)
    }

    async fn group_by_author_with_count(&self, limit: i64) -> Result<Vec<AuthorPostCount>> {
        let mut rows: Vec<AuthorPostCount> = Vec::new();
        for post in self.newest_first().into_iter().take(limit.max(0) as usize) {
            match rows.iter_mut().find(|r| r.author_id == post.author_id) {
                Some(row) => row.post_count += 1,
                None => rows.push(AuthorPostCount {
                    author_id: post.author_id,
                    post_count: 1,
                }),
            }
        }
        // Stable: equal counts stay in most-recent-activity order
        rows.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        Ok(rows)
    }
}

/// In-memory identity directory
#[derive(Default)]
pub struct FakeUserDirectory {
    users: Mutex<HashMap<String, DirectoryUser>>,
    batch_call_count: Mutex<usize>,
    requested: Mutex<Vec<Vec<String>>>,
    unavailable: Mutex<bool>,
}

impl FakeUserDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_users(users: &[(&str, &str)]) -> Arc<Self> {
        let directory = Self::default();
        for (id, handle) in users {
            directory.add_user(id, Some(handle));
        }
        Arc::new(directory)
    }

    pub fn add_user(&self, id: &str, handle: Option<&str>) {
        self.users.lock().unwrap().insert(
            id.to_string(),
            DirectoryUser {
                id: id.to_string(),
                handle: handle.map(str::to_string),
                avatar_url: Some(format!("https://img.example/{id}.png")),
            },
        );
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    /// Number of get_users_by_ids calls (for N+1 verification)
    pub fn batch_call_count(&self) -> usize {
        *self.batch_call_count.lock().unwrap()
    }

    pub fn requested_ids(&self) -> Vec<Vec<String>> {
        self.requested.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if *self.unavailable.lock().unwrap() {
            Err(AppError::Directory("identity provider unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn get_users_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<DirectoryUser>> {
        *self.batch_call_count.lock().unwrap() += 1;
        self.requested.lock().unwrap().push(ids.to_vec());
        self.check_available()?;

        let users = self.users.lock().unwrap();
        Ok(ids
            .iter()
            .take(limit)
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<DirectoryUser>> {
        self.check_available()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| {
                u.handle
                    .as_deref()
                    .is_some_and(|h| h.eq_ignore_ascii_case(username))
            })
            .cloned())
    }
}

pub fn context(store: Arc<InMemoryPostStore>, directory: Arc<FakeUserDirectory>) -> FeedContext {
    context_with(store, directory, FeedConfig::default())
}

pub fn context_with(
    store: Arc<InMemoryPostStore>,
    directory: Arc<FakeUserDirectory>,
    feed: FeedConfig,
) -> FeedContext {
    FeedContext::new(store, directory, feed)
}

/// Sign a session token for `sub` with the test key pair
pub fn session_token(sub: &str) -> String {
    signed_token(sub, 3600)
}

/// Session token that expired an hour ago
pub fn expired_session_token(sub: &str) -> String {
    signed_token(sub, -3600)
}

fn signed_token(sub: &str, expires_in_secs: i64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let now = Utc::now().timestamp();
    let claims = serde_json::json!({ "sub": sub, "iat": now, "exp": now + expires_in_secs });
    let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
}
