/// OpenAPI documentation for Nova Emoji Feed Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::{posts, profiles};
use crate::models::{ActiveUser, Author, CreatePostRequest, EmojiCount, Post, PostWithAuthor};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nova Emoji Feed Service API",
        version = "1.0.0",
        description = "Emoji-only posts, the global and per-author feeds, and top-ten rankings of emoji usage and author activity over the most recent posts.",
        contact(
            name = "Nova Team",
            email = "support@nova.app"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8082", description = "Development server"),
    ),
    paths(
        posts::get_all_posts,
        posts::create_post,
        posts::delete_post,
        posts::get_most_used_emojis,
        posts::get_most_active_users,
        profiles::get_user_by_username,
    ),
    components(schemas(
        Post,
        Author,
        PostWithAuthor,
        CreatePostRequest,
        posts::CreatePostResponse,
        EmojiCount,
        ActiveUser,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post creation, feeds and deletion"),
        (name = "rankings", description = "Most used emojis and most active authors"),
        (name = "profiles", description = "Public author lookup"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from the identity provider"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
