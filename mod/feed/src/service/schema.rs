use openfeed_sql::SQLStore;

use crate::service::FeedError;

/// Initialize the SQLite schema for all feed resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), FeedError> {
    let statements = [
        // Posts table: user-authored content
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_posts_owner ON posts(owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",

        // Post likes: which users like which post. The composite primary
        // key keeps membership duplicate-free under concurrent toggles.
        "CREATE TABLE IF NOT EXISTS post_likes (
            post_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            liked_at TEXT NOT NULL,
            PRIMARY KEY (post_id, user_id),
            FOREIGN KEY (post_id) REFERENCES posts(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_post_likes_user ON post_likes(user_id)",

        // Connections: at most one per user. The UNIQUE constraint makes
        // concurrent first accesses race on the insert; the loser fetches
        // the winner's row instead of creating a duplicate.
        "CREATE TABLE IF NOT EXISTS connections (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL UNIQUE,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",

        // Following: user ids each connection's owner follows.
        "CREATE TABLE IF NOT EXISTS connection_following (
            connection_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            followed_at TEXT NOT NULL,
            PRIMARY KEY (connection_id, user_id),
            FOREIGN KEY (connection_id) REFERENCES connections(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_connection_following_user ON connection_following(user_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| FeedError::Storage(e.to_string()))?;
    }

    Ok(())
}
