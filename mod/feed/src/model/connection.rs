use serde::{Deserialize, Serialize};

/// A user's social-graph record.
///
/// Exactly one per user, created lazily on first access and never deleted.
/// The `following` set lives in its own join table, not in this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Id of the user this connection belongs to. Unique across connections.
    pub owner_id: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}
