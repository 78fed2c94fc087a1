/// Post handlers - HTTP endpoints for the `posts.*` procedures
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::ActorId;
use crate::models::{ActiveUser, CreatePostRequest, EmojiCount, Post, PostWithAuthor};
use crate::services::{FeedAssembler, FeedContext, PostService, RankingService};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetAllPostsQuery {
    /// Only posts by this author
    pub author_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MostUsedEmojisQuery {
    /// Only count posts by this user
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePostResponse {
    pub post: Post,
}

/// posts.getAll
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(GetAllPostsQuery),
    responses(
        (status = 200, description = "Newest posts with their authors", body = [PostWithAuthor]),
        (status = 500, description = "A post references an unknown author")
    )
)]
pub async fn get_all_posts(
    ctx: web::Data<FeedContext>,
    query: web::Query<GetAllPostsQuery>,
) -> Result<HttpResponse> {
    let author_id = query.author_id.as_deref().filter(|id| !id.is_empty());
    let feed = FeedAssembler::new(&ctx).assemble_feed(author_id).await?;

    Ok(HttpResponse::Ok().json(feed))
}

/// posts.create
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Content is empty, too long or not emoji"),
        (status = 401, description = "Sign in required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    ctx: web::Data<FeedContext>,
    actor: ActorId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = PostService::new(&ctx)
        .create_post(&actor, req.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(CreatePostResponse { post }))
}

/// posts.delete
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post to delete")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Sign in required"),
        (status = 403, description = "Post belongs to another user"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    ctx: web::Data<FeedContext>,
    actor: ActorId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    PostService::new(&ctx)
        .delete_post(&actor, post_id.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// posts.getMostUsedEmojis
#[utoipa::path(
    get,
    path = "/api/v1/posts/emojis/top",
    tag = "rankings",
    params(MostUsedEmojisQuery),
    responses((status = 200, description = "Top ten emojis", body = [EmojiCount]))
)]
pub async fn get_most_used_emojis(
    ctx: web::Data<FeedContext>,
    query: web::Query<MostUsedEmojisQuery>,
) -> Result<HttpResponse> {
    let user_id = query.user_id.as_deref().filter(|id| !id.is_empty());
    let emojis = RankingService::new(&ctx).most_used_emojis(user_id).await?;

    Ok(HttpResponse::Ok().json(emojis))
}

/// posts.getMostActiveUsers
#[utoipa::path(
    get,
    path = "/api/v1/posts/authors/top",
    tag = "rankings",
    responses((status = 200, description = "Top ten authors by post count", body = [ActiveUser]))
)]
pub async fn get_most_active_users(ctx: web::Data<FeedContext>) -> Result<HttpResponse> {
    let users = RankingService::new(&ctx).most_active_users().await?;

    Ok(HttpResponse::Ok().json(users))
}
