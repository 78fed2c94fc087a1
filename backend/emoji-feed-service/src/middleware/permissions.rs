/// Ownership checks for posts
///
/// Posts are immutable; the only privileged operation is deletion, and only
/// the author may perform it.
use crate::error::AppError;
use crate::middleware::ActorId;
use crate::models::Post;

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Check if an actor authored a post
pub fn check_post_ownership(actor: &ActorId, post: &Post) -> PermissionResult {
    if post.author_id == actor.0 {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Post can only be deleted by its author".to_string(),
        ))
    }
}

/// Verify an actor may delete a post
pub fn check_post_deletion(actor: &ActorId, post: &Post) -> PermissionResult {
    check_post_ownership(actor, post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn post_by(author: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            content: "🔥".to_string(),
            author_id: author.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn author_may_delete() {
        let actor = ActorId("user_1".to_string());
        assert!(check_post_deletion(&actor, &post_by("user_1")).is_ok());
    }

    #[test]
    fn other_actor_is_forbidden() {
        let actor = ActorId("user_2".to_string());
        let err = check_post_deletion(&actor, &post_by("user_1")).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
