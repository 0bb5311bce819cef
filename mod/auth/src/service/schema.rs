use openfeed_sql::SQLStore;

use crate::service::AuthError;

/// Initialize the SQLite schema for all auth resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AuthError> {
    let statements = [
        // Users table: core identity. The password hash lives in its own
        // column, outside the JSON data blob, so it is never serialized
        // back to clients.
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)",

        // Sessions table: JWT issuance records
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            revoked INTEGER NOT NULL DEFAULT 0,
            data TEXT NOT NULL,
            issued_at TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
    }

    Ok(())
}
