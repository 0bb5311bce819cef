use openfeed_core::{new_id, now_rfc3339};
use openfeed_sql::Value;

use crate::model::{CreateUser, User};
use crate::service::{AuthError, AuthService};

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> Result<String, String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

impl AuthService {
    /// Register a new user. The username must be unique.
    pub fn register(&self, input: CreateUser) -> Result<User, AuthError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("username must not be empty".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        let hash = hash_password(&input.password).map_err(AuthError::Internal)?;

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            username: username.to_string(),
            name: input.name.unwrap_or_else(|| username.to_string()),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        self.insert_record(
            "users",
            &user.id,
            &user,
            &[
                ("username", Value::Text(user.username.clone())),
                ("password_hash", Value::Text(hash)),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )
        .map_err(|e| match e {
            AuthError::Conflict(_) => {
                AuthError::Conflict(format!("username '{}' is already taken", username))
            }
            other => other,
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.get_record("users", id)
    }

    /// Look up a user and their password hash by username.
    pub(crate) fn find_by_username(&self, username: &str) -> Result<(User, String), AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT data, password_hash FROM users WHERE username = ?1",
                &[Value::Text(username.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("users/{}", username)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
        let hash = row
            .get_str("password_hash")
            .ok_or_else(|| AuthError::Internal("missing password_hash column".into()))?;

        let user: User =
            serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok((user, hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AuthConfig;
    use openfeed_sql::SqliteStore;
    use std::sync::Arc;

    fn test_service() -> Arc<AuthService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn create(svc: &AuthService, username: &str) -> User {
        svc.register(CreateUser {
            username: username.to_string(),
            password: "correct horse".to_string(),
            name: None,
        })
        .unwrap()
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("hunter2hunter2", "not-a-hash"));
    }

    #[test]
    fn test_register_and_get() {
        let svc = test_service();
        let user = create(&svc, "alice");
        assert_eq!(user.username, "alice");
        assert_eq!(user.name, "alice");

        let fetched = svc.get_user(&user.id).unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.username, "alice");
    }

    #[test]
    fn test_register_duplicate_username() {
        let svc = test_service();
        create(&svc, "alice");

        let result = svc.register(CreateUser {
            username: "alice".to_string(),
            password: "another pass".to_string(),
            name: None,
        });
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[test]
    fn test_register_rejects_short_password() {
        let svc = test_service();
        let result = svc.register(CreateUser {
            username: "bob".to_string(),
            password: "short".to_string(),
            name: None,
        });
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_register_rejects_empty_username() {
        let svc = test_service();
        let result = svc.register(CreateUser {
            username: "   ".to_string(),
            password: "long enough".to_string(),
            name: None,
        });
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_display_name_defaults_to_username() {
        let svc = test_service();
        let user = svc
            .register(CreateUser {
                username: "carol".to_string(),
                password: "long enough".to_string(),
                name: Some("Carol C".to_string()),
            })
            .unwrap();
        assert_eq!(user.name, "Carol C");
    }

    #[test]
    fn test_password_hash_never_in_user_json() {
        let svc = test_service();
        let user = create(&svc, "dave");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }
}
