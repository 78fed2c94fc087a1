/// HTTP handlers for emoji-feed-service
///
/// Each handler serves one RPC procedure:
/// - posts.getAll, posts.create, posts.delete
/// - posts.getMostUsedEmojis, posts.getMostActiveUsers
/// - profile.getUserByUsername
pub mod posts;
pub mod profiles;

use actix_web::web;

use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};

// Re-export handler functions at module level
pub use posts::{
    create_post, delete_post, get_all_posts, get_most_active_users, get_most_used_emojis,
};
pub use profiles::get_user_by_username;

/// Register the `/api/v1` procedure routes.
///
/// Shared by the binary and the HTTP integration tests.
pub fn configure(auth: JwtAuthMiddleware) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/v1")
                .wrap(auth)
                .wrap(MetricsMiddleware)
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(get_all_posts))
                                .route(web::post().to(create_post)),
                        )
                        .route("/emojis/top", web::get().to(get_most_used_emojis))
                        .route("/authors/top", web::get().to(get_most_active_users))
                        .route("/{post_id}", web::delete().to(delete_post)),
                )
                .route("/profiles/{username}", web::get().to(get_user_by_username)),
        );
    }
}
