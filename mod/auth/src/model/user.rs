use serde::{Deserialize, Serialize};

/// A user account.
///
/// The password hash is deliberately NOT part of this struct — it lives in
/// its own column and never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Unique login name.
    pub username: String,

    /// Display name. Defaults to the username at registration.
    pub name: String,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

/// Input for registering a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Input for logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
