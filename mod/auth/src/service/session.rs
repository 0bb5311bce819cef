use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use openfeed_core::new_id;
use openfeed_sql::Value;

use crate::model::{Claims, Credentials, Session, TokenResponse, User};
use crate::service::user::verify_password;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Verify credentials and issue a signed access token.
    pub fn login(&self, credentials: &Credentials) -> Result<TokenResponse, AuthError> {
        let (user, hash) = self
            .find_by_username(&credentials.username)
            .map_err(|_| AuthError::Unauthorized("invalid credentials".into()))?;

        if !verify_password(&credentials.password, &hash) {
            return Err(AuthError::Unauthorized("invalid credentials".into()));
        }

        self.issue_token(&user)
    }

    /// Issue a JWT access token for a user, recording a session.
    pub fn issue_token(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let expires = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        let session = Session {
            id: session_id,
            user_id: user.id.clone(),
            issued_at: now.to_rfc3339(),
            expires_at: expires.to_rfc3339(),
            revoked: false,
        };

        self.insert_record(
            "sessions",
            &session.id,
            &session,
            &[
                ("user_id", Value::Text(session.user_id.clone())),
                ("revoked", Value::Integer(0)),
                ("issued_at", Value::Text(session.issued_at.clone())),
                ("expires_at", Value::Text(session.expires_at.clone())),
            ],
        )?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode a JWT access token.
    /// Returns the claims if valid and the session has not been revoked.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?;

        let claims = token_data.claims;

        let session: Session = self
            .get_record("sessions", &claims.sid)
            .map_err(|_| AuthError::Unauthorized("unknown session".into()))?;
        if session.revoked {
            return Err(AuthError::Unauthorized("session has been revoked".into()));
        }

        Ok(claims)
    }

    /// Revoke a session (its token becomes invalid).
    pub fn revoke_session(&self, session_id: &str) -> Result<(), AuthError> {
        let mut session: Session = self.get_record("sessions", session_id)?;
        session.revoked = true;

        self.update_record(
            "sessions",
            session_id,
            &session,
            &[("revoked", Value::Integer(1))],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateUser;
    use crate::service::AuthConfig;
    use openfeed_sql::SqliteStore;
    use std::sync::Arc;

    fn test_service() -> Arc<AuthService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn register(svc: &AuthService, username: &str) -> User {
        svc.register(CreateUser {
            username: username.to_string(),
            password: "correct horse".to_string(),
            name: None,
        })
        .unwrap()
    }

    #[test]
    fn test_login_and_verify() {
        let svc = test_service();
        let user = register(&svc, "alice");

        let tokens = svc
            .login(&Credentials {
                username: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert!(!tokens.access_token.is_empty());
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 86400);

        let claims = svc.verify_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "alice");
    }

    #[test]
    fn test_login_wrong_password() {
        let svc = test_service();
        register(&svc, "alice");

        let result = svc.login(&Credentials {
            username: "alice".to_string(),
            password: "wrong password".to_string(),
        });
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_login_unknown_user() {
        let svc = test_service();
        let result = svc.login(&Credentials {
            username: "nobody".to_string(),
            password: "whatever pass".to_string(),
        });
        // Unknown user and wrong password are indistinguishable.
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_revoked_session_rejected() {
        let svc = test_service();
        let user = register(&svc, "bob");

        let tokens = svc.issue_token(&user).unwrap();
        let claims = svc.verify_token(&tokens.access_token).unwrap();

        svc.revoke_session(&claims.sid).unwrap();
        assert!(svc.verify_token(&tokens.access_token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let svc = test_service();
        assert!(svc.verify_token("this.is.not.a.valid.jwt").is_err());
    }
}
