pub mod connection;
pub mod guard;
pub mod post;
pub mod schema;
pub mod toggle;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use openfeed_sql::{SQLStore, Value};

pub use guard::can_mutate;
pub use toggle::Membership;

/// Feed service error type.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    PermissionDenied(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<FeedError> for openfeed_core::ServiceError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::NotFound(m) => openfeed_core::ServiceError::NotFound(m),
            FeedError::Validation(m) => openfeed_core::ServiceError::Validation(m),
            FeedError::PermissionDenied(m) => openfeed_core::ServiceError::PermissionDenied(m),
            FeedError::Storage(m) => openfeed_core::ServiceError::Storage(m),
            FeedError::Internal(m) => openfeed_core::ServiceError::Internal(m),
        }
    }
}

/// The Feed service. Holds the storage backend.
pub struct FeedService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl FeedService {
    /// Create a new FeedService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, FeedError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    // ── Generic CRUD helpers (same pattern as AuthService) ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), FeedError> {
        let json = serde_json::to_string(record)
            .map_err(|e| FeedError::Internal(e.to_string()))?;

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

        self.sql
            .exec(&sql, &params)
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, FeedError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| FeedError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| FeedError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| FeedError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| FeedError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), FeedError> {
        let json = serde_json::to_string(record)
            .map_err(|e| FeedError::Internal(e.to_string()))?;

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
            .map_err(|e| FeedError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(FeedError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }

    /// Delete a record by id.
    pub(crate) fn delete_record(&self, table: &str, id: &str) -> Result<(), FeedError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self
            .sql
            .exec(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| FeedError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(FeedError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }
}
