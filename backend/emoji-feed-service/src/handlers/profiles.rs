/// Profile handlers - public author pages
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::Author;
use crate::services::{FeedContext, ProfileService};

/// profile.getUserByUsername
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    tag = "profiles",
    params(("username" = String, Path, description = "Handle, optionally prefixed with @")),
    responses(
        (status = 200, description = "Author attributes", body = Author),
        (status = 404, description = "No user with this handle")
    )
)]
pub async fn get_user_by_username(
    ctx: web::Data<FeedContext>,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = ProfileService::new(&ctx)
        .get_user_by_username(&username)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": author })))
}
