//! Ownership authorization for post mutation.

use crate::model::Post;
use crate::service::FeedError;

/// Ownership predicate: true iff the acting user owns the post.
///
/// Pure check with no side effects. Applied before every update and
/// delete; failure is a refusal, never a not-found.
pub fn can_mutate(acting_user_id: &str, post: &Post) -> bool {
    post.owner_id == acting_user_id
}

/// Refuse mutation when the acting user does not own the post.
pub(crate) fn ensure_owner(acting_user_id: &str, post: &Post) -> Result<(), FeedError> {
    if can_mutate(acting_user_id, post) {
        Ok(())
    } else {
        Err(FeedError::PermissionDenied(format!(
            "posts/{} belongs to another user",
            post.id
        )))
    }
}
