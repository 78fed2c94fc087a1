use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{UserDirectory, MAX_BATCH_SIZE};
use crate::config::IdentityConfig;
use crate::error::{AppError, Result};
use crate::metrics::posts::DIRECTORY_LOOKUPS_TOTAL;
use crate::models::DirectoryUser;

/// User record shape of the identity provider's backend API
#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    username: Option<String>,
    image_url: Option<String>,
    /// Older API versions only send this field
    profile_image_url: Option<String>,
}

impl From<ApiUser> for DirectoryUser {
    fn from(user: ApiUser) -> Self {
        DirectoryUser {
            id: user.id,
            handle: user.username.filter(|u| !u.is_empty()),
            avatar_url: user.image_url.or(user.profile_image_url),
        }
    }
}

/// Identity directory backed by the provider's `GET /v1/users` endpoint
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpUserDirectory {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    async fn list_users(
        &self,
        operation: &'static str,
        params: &[(&str, String)],
    ) -> Result<Vec<DirectoryUser>> {
        let url = format!("{}/v1/users", self.base_url);

        let result = async {
            let users = self
                .client
                .get(&url)
                .bearer_auth(&self.secret_key)
                .query(params)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<ApiUser>>()
                .await?;
            Ok::<_, reqwest::Error>(users)
        }
        .await;

        match result {
            Ok(users) => {
                DIRECTORY_LOOKUPS_TOTAL
                    .with_label_values(&[operation, "success"])
                    .inc();
                Ok(users.into_iter().map(DirectoryUser::from).collect())
            }
            Err(e) => {
                DIRECTORY_LOOKUPS_TOTAL
                    .with_label_values(&[operation, "error"])
                    .inc();
                Err(AppError::from(e))
            }
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_users_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<DirectoryUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.min(MAX_BATCH_SIZE);
        let mut params: Vec<(&str, String)> = ids
            .iter()
            .take(limit)
            .map(|id| ("user_id", id.clone()))
            .collect();
        params.push(("limit", limit.to_string()));

        debug!(requested = ids.len(), limit, "Resolving users by id");
        self.list_users("get_users_by_ids", &params).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<DirectoryUser>> {
        let params = [("username", username.to_string()), ("limit", "1".to_string())];
        let users = self.list_users("get_user_by_username", &params).await?;

        // The provider matches usernames case-insensitively
        Ok(users.into_iter().find(|u| {
            u.handle
                .as_deref()
                .is_some_and(|h| h.eq_ignore_ascii_case(username))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_user_prefers_image_url() {
        let user: ApiUser = serde_json::from_value(serde_json::json!({
            "id": "user_1",
            "username": "ferris",
            "image_url": "https://img.example/new.png",
            "profile_image_url": "https://img.example/old.png",
            "first_name": "Ferris"
        }))
        .unwrap();

        let user = DirectoryUser::from(user);
        assert_eq!(user.handle.as_deref(), Some("ferris"));
        assert_eq!(user.avatar_url.as_deref(), Some("https://img.example/new.png"));
    }

    #[test]
    fn empty_username_is_missing_handle() {
        let user: ApiUser = serde_json::from_value(serde_json::json!({
            "id": "user_2",
            "username": "",
            "profile_image_url": "https://img.example/old.png"
        }))
        .unwrap();

        let user = DirectoryUser::from(user);
        assert_eq!(user.handle, None);
        assert_eq!(user.avatar_url.as_deref(), Some("https://img.example/old.png"));
    }
}
