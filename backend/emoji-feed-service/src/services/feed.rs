/// Feed assembler - joins recent posts with their authors
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, error};

use super::FeedContext;
use crate::directory::MAX_BATCH_SIZE;
use crate::error::{AppError, Result};
use crate::metrics::posts::{FEED_ASSEMBLY_DURATION_SECONDS, INTEGRITY_FAULTS_TOTAL};
use crate::models::{Author, DirectoryUser, Post, PostQuery, PostWithAuthor};

pub struct FeedAssembler<'a> {
    ctx: &'a FeedContext,
}

impl<'a> FeedAssembler<'a> {
    pub fn new(ctx: &'a FeedContext) -> Self {
        Self { ctx }
    }

    /// Most recent posts, newest first, each with its author.
    ///
    /// Fails with `AppError::Integrity` when any post's author is unknown to
    /// the identity directory or has no handle.
    pub async fn assemble_feed(&self, author_id: Option<&str>) -> Result<Vec<PostWithAuthor>> {
        let scope = if author_id.is_some() { "author" } else { "global" };
        let start = Instant::now();

        let query = PostQuery::recent(author_id.map(str::to_string), self.ctx.feed.recency_window);
        let posts = self.ctx.posts.find(&query).await?;
        debug!(count = posts.len(), scope, "Loaded posts for feed");

        let authors = resolve_authors(self.ctx, posts.iter().map(|p| p.author_id.as_str())).await?;

        let feed = posts
            .into_iter()
            .map(|post| {
                let author = join_author(&authors, &post)?;
                Ok(PostWithAuthor { post, author })
            })
            .collect::<Result<Vec<_>>>()?;

        FEED_ASSEMBLY_DURATION_SECONDS
            .with_label_values(&[scope])
            .observe(start.elapsed().as_secs_f64());

        Ok(feed)
    }
}

/// Resolve every distinct author id, one directory call per
/// `MAX_BATCH_SIZE` ids. The default recency window fits in a single call.
pub(crate) async fn resolve_authors<'s>(
    ctx: &FeedContext,
    author_ids: impl Iterator<Item = &'s str>,
) -> Result<HashMap<String, DirectoryUser>> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = author_ids
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let batches = ids
        .chunks(MAX_BATCH_SIZE)
        .map(|batch| ctx.users.get_users_by_ids(batch, batch.len()));
    let users = try_join_all(batches).await?;
    debug!(
        authors = ids.len(),
        batches = users.len(),
        "Resolved authors from identity directory"
    );

    Ok(users
        .into_iter()
        .flatten()
        .map(|u| (u.id.clone(), u))
        .collect())
}

fn join_author(authors: &HashMap<String, DirectoryUser>, post: &Post) -> Result<Author> {
    let user = authors.get(&post.author_id);
    match user.and_then(|u| u.handle.as_ref().map(|h| (u, h))) {
        Some((user, handle)) => Ok(Author {
            id: user.id.clone(),
            handle: handle.clone(),
            avatar_url: user.avatar_url.clone().unwrap_or_default(),
        }),
        None => {
            INTEGRITY_FAULTS_TOTAL.inc();
            error!(
                post_id = %post.id,
                author_id = %post.author_id,
                resolved = user.is_some(),
                "Post author missing from identity directory"
            );
            Err(AppError::Integrity(format!(
                "Author for post {} not found",
                post.id
            )))
        }
    }
}
