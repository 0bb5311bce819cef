//! The acting identity attached to each authenticated request.
//!
//! The auth middleware verifies the bearer token and inserts a
//! [`CurrentUser`] into the request extensions. Business modules consume
//! it via `Extension<CurrentUser>` without depending on the auth module
//! or its token format.

use serde::{Deserialize, Serialize};

/// The authenticated user for the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Id of the session the presented token belongs to.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_not_serialized_when_empty() {
        let user = CurrentUser {
            id: "u1".into(),
            name: "Alice".into(),
            session_id: String::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("session_id").is_none());
        assert_eq!(json["id"], "u1");
    }
}
