//! The membership toggle shared by likes and follows.

use openfeed_core::now_rfc3339;
use openfeed_sql::Value;

use crate::model::Post;
use crate::service::{FeedError, FeedService};

/// Resulting membership state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Added,
    Removed,
}

impl FeedService {
    /// Flip membership of `member` in a join-table set.
    ///
    /// Present → removed; absent → added. Each call flips state exactly
    /// once, so two consecutive identical calls restore the original state.
    fn toggle_membership(
        &self,
        table: &str,
        key_col: &str,
        key: &str,
        member: &str,
        ts_col: &str,
    ) -> Result<Membership, FeedError> {
        let delete = format!("DELETE FROM {} WHERE {} = ?1 AND user_id = ?2", table, key_col);
        let removed = self
            .sql
            .exec(&delete, &[Value::Text(key.to_string()), Value::Text(member.to_string())])
            .map_err(|e| FeedError::Storage(e.to_string()))?;
        if removed > 0 {
            return Ok(Membership::Removed);
        }

        let insert = format!(
            "INSERT OR IGNORE INTO {} ({}, user_id, {}) VALUES (?1, ?2, ?3)",
            table, key_col, ts_col,
        );
        self.sql
            .exec(
                &insert,
                &[
                    Value::Text(key.to_string()),
                    Value::Text(member.to_string()),
                    Value::Text(now_rfc3339()),
                ],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;
        Ok(Membership::Added)
    }

    /// Toggle the acting user's like on a post.
    pub fn toggle_like(&self, post_id: &str, acting_user_id: &str) -> Result<Membership, FeedError> {
        // Surface a missing post as 404 before touching the membership.
        let _: Post = self.get_record("posts", post_id)?;

        let state = self.toggle_membership("post_likes", "post_id", post_id, acting_user_id, "liked_at")?;
        tracing::debug!(post_id, user_id = acting_user_id, ?state, "like toggled");
        Ok(state)
    }

    /// Toggle the acting user's follow of a post's owner.
    ///
    /// The target is always derived from the post named in the request,
    /// never taken as a raw user id. Returns the new state and the target.
    pub fn toggle_follow(
        &self,
        acting_user_id: &str,
        post_id: &str,
    ) -> Result<(Membership, String), FeedError> {
        let post: Post = self.get_record("posts", post_id)?;
        let connection = self.connection_for(acting_user_id)?;

        let state = self.toggle_membership(
            "connection_following",
            "connection_id",
            &connection.id,
            &post.owner_id,
            "followed_at",
        )?;
        tracing::debug!(
            user_id = acting_user_id,
            target_user = %post.owner_id,
            ?state,
            "follow toggled"
        );
        Ok((state, post.owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreatePost;
    use openfeed_sql::SqliteStore;
    use std::sync::Arc;

    fn test_service() -> Arc<FeedService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        FeedService::new(sql).unwrap()
    }

    fn create(svc: &FeedService, owner: &str, title: &str) -> Post {
        svc.create_post(
            owner,
            CreatePost {
                title: title.to_string(),
                content: "some content".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_like_toggle_flips_each_call() {
        let svc = test_service();
        let post = create(&svc, "alice", "Toggled");

        assert_eq!(svc.toggle_like(&post.id, "bob").unwrap(), Membership::Added);
        assert_eq!(svc.liked_by(&post.id).unwrap(), vec!["bob".to_string()]);

        assert_eq!(svc.toggle_like(&post.id, "bob").unwrap(), Membership::Removed);
        assert!(svc.liked_by(&post.id).unwrap().is_empty());

        // A pair of toggles is a no-op regardless of the starting state.
        svc.toggle_like(&post.id, "bob").unwrap();
        svc.toggle_like(&post.id, "carol").unwrap();
        svc.toggle_like(&post.id, "carol").unwrap();
        assert_eq!(svc.liked_by(&post.id).unwrap(), vec!["bob".to_string()]);
    }

    #[test]
    fn test_like_missing_post_is_not_found() {
        let svc = test_service();
        let result = svc.toggle_like("missing", "bob");
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_own_post_can_be_liked() {
        let svc = test_service();
        let post = create(&svc, "alice", "Mine");
        assert_eq!(svc.toggle_like(&post.id, "alice").unwrap(), Membership::Added);
        assert_eq!(svc.liked_by(&post.id).unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_follow_then_list() {
        let svc = test_service();
        let post = create(&svc, "alice", "Hello");

        let (state, target) = svc.toggle_follow("bob", &post.id).unwrap();
        assert_eq!(state, Membership::Added);
        assert_eq!(target, "alice");

        let feed = svc.list_following("bob").unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, post.id);

        let (state, _) = svc.toggle_follow("bob", &post.id).unwrap();
        assert_eq!(state, Membership::Removed);
        assert!(svc.list_following("bob").unwrap().is_empty());
    }

    #[test]
    fn test_follow_is_one_directional() {
        let svc = test_service();
        let a_post = create(&svc, "alice", "A");
        create(&svc, "bob", "B");

        svc.toggle_follow("bob", &a_post.id).unwrap();

        // Bob follows Alice; Alice does not follow Bob.
        assert_eq!(svc.list_following("bob").unwrap().len(), 1);
        assert!(svc.list_following("alice").unwrap().is_empty());
    }

    #[test]
    fn test_follow_missing_post_is_not_found() {
        let svc = test_service();
        let result = svc.toggle_follow("bob", "missing");
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_self_follow_via_own_post() {
        let svc = test_service();
        let post = create(&svc, "alice", "Mine");

        let (state, target) = svc.toggle_follow("alice", &post.id).unwrap();
        assert_eq!(state, Membership::Added);
        assert_eq!(target, "alice");

        // Following yourself surfaces your own posts in the following-feed.
        assert_eq!(svc.list_following("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_follow_covers_all_target_posts() {
        let svc = test_service();
        let first = create(&svc, "alice", "First");
        create(&svc, "alice", "Second");
        create(&svc, "carol", "Other");

        svc.toggle_follow("bob", &first.id).unwrap();

        // Following Alice surfaces all of her posts, nobody else's.
        let feed = svc.list_following("bob").unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|p| p.owner_id == "alice"));
    }

    #[test]
    fn test_scenario_like_and_follow() {
        let svc = test_service();

        // A creates a post; B sees it in the others-feed.
        let post = create(&svc, "user-a", "Hello");
        let others = svc.list_others("user-b").unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].title, "Hello");

        // B likes it, then unlikes it.
        svc.toggle_like(&post.id, "user-b").unwrap();
        assert_eq!(svc.liked_by(&post.id).unwrap(), vec!["user-b".to_string()]);
        svc.toggle_like(&post.id, "user-b").unwrap();
        assert!(svc.liked_by(&post.id).unwrap().is_empty());

        // B follows A from the post, sees A's posts, then unfollows.
        svc.toggle_follow("user-b", &post.id).unwrap();
        let feed = svc.list_following("user-b").unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "Hello");

        svc.toggle_follow("user-b", &post.id).unwrap();
        assert!(svc.list_following("user-b").unwrap().is_empty());
    }
}
