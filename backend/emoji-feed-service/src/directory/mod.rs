/// Identity directory adapter
///
/// Users live in the external identity provider. The service only relies on
/// `{id, handle, avatar_url}` and fetches them per request; nothing is cached.
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::DirectoryUser;

pub use http::HttpUserDirectory;

/// Batch lookup limit accepted by the identity provider
pub const MAX_BATCH_SIZE: usize = 100;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve up to `limit` users by id in a single round trip.
    /// Unknown ids are simply absent from the result.
    async fn get_users_by_ids(&self, ids: &[String], limit: usize) -> Result<Vec<DirectoryUser>>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<DirectoryUser>>;
}
