/// Business logic layer for emoji-feed-service
///
/// - Post service: create and delete emoji posts
/// - Feed assembler: posts joined with their authors
/// - Ranking service: most used emojis and most active users
/// - Profile service: author lookup by handle
///
/// Every operation receives its collaborators through `FeedContext` and the
/// acting user as an explicit argument.
pub mod feed;
pub mod graphemes;
pub mod posts;
pub mod profiles;
pub mod ranking;
pub mod rankings;

use std::sync::Arc;

use crate::config::FeedConfig;
use crate::db::PostStore;
use crate::directory::UserDirectory;

// Re-export commonly used services
pub use feed::FeedAssembler;
pub use posts::PostService;
pub use profiles::ProfileService;
pub use ranking::{rank_by_frequency, FrequencyRanker};
pub use rankings::RankingService;

/// Handles shared by all request-scoped services
#[derive(Clone)]
pub struct FeedContext {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserDirectory>,
    pub feed: FeedConfig,
}

impl FeedContext {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserDirectory>, feed: FeedConfig) -> Self {
        Self { posts, users, feed }
    }
}
