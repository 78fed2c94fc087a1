/// Ranking service - most used emojis and most active users over the
/// recency window
use tracing::debug;

use super::feed::resolve_authors;
use super::graphemes::emoji_graphemes;
use super::ranking::FrequencyRanker;
use super::FeedContext;
use crate::error::Result;
use crate::metrics::posts::RANKING_REQUESTS_TOTAL;
use crate::models::{ActiveUser, EmojiCount, PostQuery};

/// Label used when an author cannot be resolved
pub const UNKNOWN_AUTHOR_LABEL: &str = "unknown";

pub struct RankingService<'a> {
    ctx: &'a FeedContext,
}

impl<'a> RankingService<'a> {
    pub fn new(ctx: &'a FeedContext) -> Self {
        Self { ctx }
    }

    /// Emoji usage across the most recent posts, optionally for one author
    pub async fn most_used_emojis(&self, user_id: Option<&str>) -> Result<Vec<EmojiCount>> {
        let ranking = if user_id.is_some() {
            "emojis_by_user"
        } else {
            "emojis"
        };
        RANKING_REQUESTS_TOTAL.with_label_values(&[ranking]).inc();

        let query = PostQuery::recent(user_id.map(str::to_string), self.ctx.feed.recency_window);
        let posts = self.ctx.posts.find(&query).await?;

        let mut ranker = FrequencyRanker::new();
        for post in &posts {
            for emoji in emoji_graphemes(&post.content) {
                ranker.record(emoji, emoji);
            }
        }
        debug!(
            posts = posts.len(),
            distinct = ranker.distinct(),
            "Counted emoji usage"
        );

        Ok(ranker
            .top(self.ctx.feed.top_n)
            .into_iter()
            .map(EmojiCount::from)
            .collect())
    }

    /// Post counts per author across the most recent posts.
    ///
    /// Authors missing from the identity directory are labelled `"unknown"`.
    pub async fn most_active_users(&self) -> Result<Vec<ActiveUser>> {
        RANKING_REQUESTS_TOTAL
            .with_label_values(&["active_users"])
            .inc();

        let counts = self
            .ctx
            .posts
            .group_by_author_with_count(self.ctx.feed.recency_window)
            .await?;

        let authors = resolve_authors(self.ctx, counts.iter().map(|c| c.author_id.as_str())).await?;

        let mut ranker = FrequencyRanker::new();
        for row in &counts {
            let label = authors
                .get(&row.author_id)
                .and_then(|u| u.handle.as_deref())
                .unwrap_or(UNKNOWN_AUTHOR_LABEL);
            ranker.tally(&row.author_id, label, row.post_count.max(0) as u64);
        }

        Ok(ranker
            .top(self.ctx.feed.top_n)
            .into_iter()
            .map(ActiveUser::from)
            .collect())
    }
}
