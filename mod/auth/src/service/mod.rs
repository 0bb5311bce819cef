pub mod schema;
pub mod session;
pub mod user;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use openfeed_sql::{SQLStore, Value};

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for openfeed_core::ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => openfeed_core::ServiceError::NotFound(m),
            AuthError::Conflict(m) => openfeed_core::ServiceError::Conflict(m),
            AuthError::Validation(m) => openfeed_core::ServiceError::Validation(m),
            AuthError::Unauthorized(m) => openfeed_core::ServiceError::Unauthorized(m),
            AuthError::Storage(m) => openfeed_core::ServiceError::Storage(m),
            AuthError::Internal(m) => openfeed_core::ServiceError::Internal(m),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "openfeed-dev-secret-change-me".to_string(),
            access_token_ttl: 86400, // 24h
        }
    }
}

/// The Auth service. Holds the storage backend and configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }

    // ── Generic CRUD helpers (same pattern as FeedService) ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                AuthError::Conflict(msg)
            } else {
                AuthError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, AuthError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 2;
            sets.push(format!("{} = ?{}", col, idx));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            id_idx,
        );

        let affected = self
            .sql
            .exec(&sql, &params)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(AuthError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }
}
