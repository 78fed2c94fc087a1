/// Profile service - public author lookup by handle
use super::FeedContext;
use crate::error::{AppError, Result};
use crate::models::Author;

pub struct ProfileService<'a> {
    ctx: &'a FeedContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a FeedContext) -> Self {
        Self { ctx }
    }

    /// Resolve a handle (with or without a leading `@`) to its author
    pub async fn get_user_by_username(&self, username: &str) -> Result<Author> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Err(AppError::invalid_field("username", "Username is required"));
        }

        let user = self
            .ctx
            .users
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))?;

        let handle = user
            .handle
            .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))?;

        Ok(Author {
            id: user.id,
            handle,
            avatar_url: user.avatar_url.unwrap_or_default(),
        })
    }
}
