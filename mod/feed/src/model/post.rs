use serde::{Deserialize, Serialize};

/// A user-authored post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Id of the user who wrote the post. Immutable after creation.
    pub owner_id: String,

    /// Short title.
    pub title: String,

    /// Text body.
    pub content: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// Input for creating a post. The owner comes from the request identity,
/// never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
}

/// Input for editing a post. Only title and content are editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
}
