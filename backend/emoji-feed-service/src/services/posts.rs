/// Post service - handles post creation and deletion
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::FeedContext;
use crate::error::{AppError, Result};
use crate::metrics::posts::POST_MUTATIONS_TOTAL;
use crate::middleware::{check_post_deletion, ActorId};
use crate::models::{CreatePostRequest, NewPost, Post};

pub struct PostService<'a> {
    ctx: &'a FeedContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a FeedContext) -> Self {
        Self { ctx }
    }

    /// Create a post authored by `actor`. Content is stored exactly as sent.
    pub async fn create_post(&self, actor: &ActorId, req: CreatePostRequest) -> Result<Post> {
        if let Err(errors) = req.validate() {
            POST_MUTATIONS_TOTAL
                .with_label_values(&["create", "invalid"])
                .inc();
            return Err(AppError::from(errors));
        }

        let post = self
            .ctx
            .posts
            .create(NewPost {
                content: req.content,
                author_id: actor.0.clone(),
            })
            .await
            .map_err(|e| {
                POST_MUTATIONS_TOTAL.with_label_values(&["create", "error"]).inc();
                e
            })?;

        POST_MUTATIONS_TOTAL
            .with_label_values(&["create", "success"])
            .inc();
        info!(post_id = %post.id, author_id = %post.author_id, "Post created");

        Ok(post)
    }

    /// Delete a post. Only its author may do so.
    ///
    /// A missing post is `NotFound`; someone else's post is `Forbidden`.
    pub async fn delete_post(&self, actor: &ActorId, post_id: Uuid) -> Result<()> {
        let post = match self.ctx.posts.find_unique(post_id).await? {
            Some(post) => post,
            None => {
                POST_MUTATIONS_TOTAL
                    .with_label_values(&["delete", "not_found"])
                    .inc();
                return Err(AppError::NotFound(format!("Post {post_id} not found")));
            }
        };

        if let Err(e) = check_post_deletion(actor, &post) {
            POST_MUTATIONS_TOTAL
                .with_label_values(&["delete", "forbidden"])
                .inc();
            warn!(
                %post_id,
                actor_id = %actor.0,
                author_id = %post.author_id,
                "Rejected delete of another user's post"
            );
            return Err(e);
        }

        // Delete by (id, author), never by id alone
        let deleted = self.ctx.posts.delete(post_id, actor.as_str()).await?;
        if deleted {
            info!(%post_id, actor_id = %actor.0, "Post deleted");
        } else {
            info!(%post_id, actor_id = %actor.0, "Post already deleted");
        }

        POST_MUTATIONS_TOTAL
            .with_label_values(&["delete", "success"])
            .inc();
        Ok(())
    }
}
