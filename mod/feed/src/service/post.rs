use openfeed_core::{new_id, now_rfc3339};
use openfeed_sql::Value;

use crate::model::{CreatePost, Post, PostView, UpdatePost};
use crate::service::guard;
use crate::service::{FeedError, FeedService};

fn validate_fields(title: &str, content: &str) -> Result<(), FeedError> {
    if title.trim().is_empty() {
        return Err(FeedError::Validation("title must not be empty".into()));
    }
    if content.trim().is_empty() {
        return Err(FeedError::Validation("content must not be empty".into()));
    }
    Ok(())
}

impl FeedService {
    /// Create a new post owned by the acting user.
    pub fn create_post(&self, owner_id: &str, input: CreatePost) -> Result<Post, FeedError> {
        validate_fields(&input.title, &input.content)?;

        let now = now_rfc3339();
        let post = Post {
            id: new_id(),
            owner_id: owner_id.to_string(),
            title: input.title,
            content: input.content,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        self.insert_record(
            "posts",
            &post.id,
            &post,
            &[
                ("owner_id", Value::Text(post.owner_id.clone())),
                ("title", Value::Text(post.title.clone())),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;

        Ok(post)
    }

    /// Get a post by id.
    pub fn get_post(&self, id: &str) -> Result<Post, FeedError> {
        self.get_record("posts", id)
    }

    /// Get a post by id, refusing users other than its owner.
    ///
    /// Backs the edit and delete views: the form/confirm reads and the
    /// submits all pass through the same ownership check.
    pub fn editable_post(&self, id: &str, acting_user_id: &str) -> Result<Post, FeedError> {
        let post = self.get_post(id)?;
        guard::ensure_owner(acting_user_id, &post)?;
        Ok(post)
    }

    /// Edit a post's title and content. Owner only.
    pub fn update_post(
        &self,
        id: &str,
        acting_user_id: &str,
        input: UpdatePost,
    ) -> Result<Post, FeedError> {
        let mut post = self.editable_post(id, acting_user_id)?;
        validate_fields(&input.title, &input.content)?;

        let now = now_rfc3339();
        post.title = input.title;
        post.content = input.content;
        post.updated_at = now.clone();

        self.update_record(
            "posts",
            id,
            &post,
            &[
                ("title", Value::Text(post.title.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;

        Ok(post)
    }

    /// Delete a post. Owner only. Removes its like memberships as well.
    pub fn delete_post(&self, id: &str, acting_user_id: &str) -> Result<(), FeedError> {
        let post = self.editable_post(id, acting_user_id)?;

        self.sql
            .exec(
                "DELETE FROM post_likes WHERE post_id = ?1",
                &[Value::Text(post.id.clone())],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        self.delete_record("posts", id)
    }

    // ── Feed queries ──

    /// Posts by everyone except the acting user, newest first.
    pub fn list_others(&self, user_id: &str) -> Result<Vec<Post>, FeedError> {
        self.select_posts(
            "SELECT data FROM posts WHERE owner_id != ?1 ORDER BY created_at DESC",
            &[Value::Text(user_id.to_string())],
        )
    }

    /// The acting user's own posts, newest first.
    pub fn list_mine(&self, user_id: &str) -> Result<Vec<Post>, FeedError> {
        self.select_posts(
            "SELECT data FROM posts WHERE owner_id = ?1 ORDER BY created_at DESC",
            &[Value::Text(user_id.to_string())],
        )
    }

    /// Posts whose owner is in the acting user's following set, newest first.
    pub fn list_following(&self, user_id: &str) -> Result<Vec<Post>, FeedError> {
        let connection = self.connection_for(user_id)?;
        let following = self.following(&connection.id)?;
        if following.is_empty() {
            return Ok(Vec::new());
        }

        let mut placeholders = Vec::new();
        let mut params = Vec::new();
        for (i, id) in following.iter().enumerate() {
            placeholders.push(format!("?{}", i + 1));
            params.push(Value::Text(id.clone()));
        }

        let sql = format!(
            "SELECT data FROM posts WHERE owner_id IN ({}) ORDER BY created_at DESC",
            placeholders.join(", "),
        );
        self.select_posts(&sql, &params)
    }

    /// User ids that currently like a post, oldest like first.
    pub fn liked_by(&self, post_id: &str) -> Result<Vec<String>, FeedError> {
        let rows = self
            .sql
            .query(
                "SELECT user_id FROM post_likes WHERE post_id = ?1 ORDER BY liked_at",
                &[Value::Text(post_id.to_string())],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("user_id").map(|s| s.to_string()))
            .collect())
    }

    /// Resolve a post into its view shape (post + who liked it).
    pub fn post_view(&self, post: Post) -> Result<PostView, FeedError> {
        let liked_by = self.liked_by(&post.id)?;
        Ok(PostView { post, liked_by })
    }

    /// Resolve a list of posts into view shapes.
    pub fn post_views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, FeedError> {
        posts.into_iter().map(|p| self.post_view(p)).collect()
    }

    fn select_posts(&self, sql: &str, params: &[Value]) -> Result<Vec<Post>, FeedError> {
        let rows = self
            .sql
            .query(sql, params)
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        let mut posts = Vec::new();
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| FeedError::Internal("missing data column".into()))?;
            let post: Post =
                serde_json::from_str(data).map_err(|e| FeedError::Internal(e.to_string()))?;
            posts.push(post);
        }
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_post_crud() {
        let svc = test_service();

        let post = create(&svc, "alice", "First");
        assert_eq!(post.owner_id, "alice");

        let fetched = svc.get_post(&post.id).unwrap();
        assert_eq!(fetched.title, "First");

        let updated = svc
            .update_post(
                &post.id,
                "alice",
                UpdatePost {
                    title: "Edited".to_string(),
                    content: "new content".to_string(),
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Edited");
        assert_eq!(svc.get_post(&post.id).unwrap().title, "Edited");

        svc.delete_post(&post.id, "alice").unwrap();
        assert!(matches!(svc.get_post(&post.id), Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_create_requires_fields() {
        let svc = test_service();

        let result = svc.create_post(
            "alice",
            CreatePost {
                title: "  ".to_string(),
                content: "body".to_string(),
            },
        );
        assert!(matches!(result, Err(FeedError::Validation(_))));

        let result = svc.create_post(
            "alice",
            CreatePost {
                title: "Title".to_string(),
                content: "".to_string(),
            },
        );
        assert!(matches!(result, Err(FeedError::Validation(_))));
    }

    #[test]
    fn test_only_owner_can_update() {
        let svc = test_service();
        let post = create(&svc, "alice", "Hers");

        let result = svc.update_post(
            &post.id,
            "bob",
            UpdatePost {
                title: "Hijacked".to_string(),
                content: "nope".to_string(),
            },
        );
        assert!(matches!(result, Err(FeedError::PermissionDenied(_))));
        assert_eq!(svc.get_post(&post.id).unwrap().title, "Hers");
    }

    #[test]
    fn test_only_owner_can_delete() {
        let svc = test_service();
        let post = create(&svc, "alice", "Hers");

        let result = svc.delete_post(&post.id, "bob");
        assert!(matches!(result, Err(FeedError::PermissionDenied(_))));
        assert!(svc.get_post(&post.id).is_ok());

        svc.delete_post(&post.id, "alice").unwrap();
    }

    #[test]
    fn test_update_missing_post_is_not_found() {
        let svc = test_service();
        let result = svc.update_post(
            "missing",
            "alice",
            UpdatePost {
                title: "x".to_string(),
                content: "y".to_string(),
            },
        );
        assert!(matches!(result, Err(FeedError::NotFound(_))));
    }

    #[test]
    fn test_feed_visibility() {
        let svc = test_service();
        let a_post = create(&svc, "alice", "From Alice");
        let b_post = create(&svc, "bob", "From Bob");

        // Others-feed excludes exactly the acting user's own posts.
        let others = svc.list_others("alice").unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, b_post.id);

        let mine = svc.list_mine("alice").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a_post.id);

        // A user with no posts sees everything in others and nothing in mine.
        assert_eq!(svc.list_others("carol").unwrap().len(), 2);
        assert!(svc.list_mine("carol").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_likes() {
        let svc = test_service();
        let post = create(&svc, "alice", "Liked");

        svc.toggle_like(&post.id, "bob").unwrap();
        assert_eq!(svc.liked_by(&post.id).unwrap(), vec!["bob".to_string()]);

        svc.delete_post(&post.id, "alice").unwrap();
        assert!(svc.liked_by(&post.id).unwrap().is_empty());
    }

    #[test]
    fn test_post_view_includes_likes() {
        let svc = test_service();
        let post = create(&svc, "alice", "Viewed");
        svc.toggle_like(&post.id, "bob").unwrap();

        let view = svc.post_view(svc.get_post(&post.id).unwrap()).unwrap();
        assert_eq!(view.liked_by, vec!["bob".to_string()]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Viewed");
        assert_eq!(json["liked_by"][0], "bob");
    }
}
