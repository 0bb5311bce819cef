use openfeed_core::{new_id, now_rfc3339, CurrentUser};
use openfeed_sql::Value;

use crate::model::{Connection, ConnectionView, ViewContext};
use crate::service::{FeedError, FeedService};

impl FeedService {
    /// Fetch the user's connection, creating it on first access.
    ///
    /// The insert is a no-op when a connection already exists (UNIQUE on
    /// owner_id), so concurrent first accesses converge on one row.
    pub fn connection_for(&self, user_id: &str) -> Result<Connection, FeedError> {
        let candidate = Connection {
            id: new_id(),
            owner_id: user_id.to_string(),
            created_at: now_rfc3339(),
        };
        let json = serde_json::to_string(&candidate)
            .map_err(|e| FeedError::Internal(e.to_string()))?;

        let inserted = self
            .sql
            .exec(
                "INSERT OR IGNORE INTO connections (id, owner_id, data, created_at) VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::Text(candidate.id.clone()),
                    Value::Text(candidate.owner_id.clone()),
                    Value::Text(json),
                    Value::Text(candidate.created_at.clone()),
                ],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        if inserted > 0 {
            tracing::debug!(user_id, connection_id = %candidate.id, "created connection");
        }

        let rows = self
            .sql
            .query(
                "SELECT data FROM connections WHERE owner_id = ?1",
                &[Value::Text(user_id.to_string())],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| FeedError::Internal(format!("connection for {} vanished", user_id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| FeedError::Internal("missing data column".into()))?;

        serde_json::from_str(data).map_err(|e| FeedError::Internal(e.to_string()))
    }

    /// User ids the connection's owner follows, oldest follow first.
    pub fn following(&self, connection_id: &str) -> Result<Vec<String>, FeedError> {
        let rows = self
            .sql
            .query(
                "SELECT user_id FROM connection_following WHERE connection_id = ?1 ORDER BY followed_at",
                &[Value::Text(connection_id.to_string())],
            )
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("user_id").map(|s| s.to_string()))
            .collect())
    }

    /// The user's connection with its resolved following set.
    pub fn connection_view(&self, user_id: &str) -> Result<ConnectionView, FeedError> {
        let connection = self.connection_for(user_id)?;
        let following = self.following(&connection.id)?;
        Ok(ConnectionView {
            id: connection.id,
            owner_id: connection.owner_id,
            following,
        })
    }

    /// Build the per-request view context for the acting user.
    pub fn view_context(&self, user: &CurrentUser) -> Result<ViewContext, FeedError> {
        let connection = self.connection_view(&user.id)?;
        Ok(ViewContext {
            user: user.clone(),
            connection,
        })
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

    #[test]
    fn test_get_or_create_is_stable() {
        let svc = test_service();

        let first = svc.connection_for("alice").unwrap();
        let second = svc.connection_for("alice").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.owner_id, "alice");

        // One row only, even after repeated access.
        let rows = svc
            .sql
            .query("SELECT COUNT(*) AS cnt FROM connections", &[])
            .unwrap();
        assert_eq!(rows[0].get_i64("cnt"), Some(1));
    }

    #[test]
    fn test_connections_are_per_user() {
        let svc = test_service();
        let a = svc.connection_for("alice").unwrap();
        let b = svc.connection_for("bob").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_following_starts_empty() {
        let svc = test_service();
        let conn = svc.connection_for("alice").unwrap();
        assert!(svc.following(&conn.id).unwrap().is_empty());

        let view = svc.connection_view("alice").unwrap();
        assert_eq!(view.id, conn.id);
        assert!(view.following.is_empty());
    }

    #[test]
    fn test_view_context_carries_connection() {
        let svc = test_service();
        let user = CurrentUser {
            id: "alice".into(),
            name: "Alice".into(),
            session_id: String::new(),
        };
        let ctx = svc.view_context(&user).unwrap();
        assert_eq!(ctx.user.id, "alice");
        assert_eq!(ctx.connection.owner_id, "alice");
    }
}
