//! Auth module — user accounts + password login + JWT sessions.
//!
//! # Resources
//!
//! - **User** — identity with a unique username and an argon2id password hash
//! - **Session** — JWT issuance record; revoked on logout
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let router = module.routes(); // Mount under /auth
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use openfeed_core::Module;

use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
///
/// Holds the AuthService and provides HTTP routes for account endpoints.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule.
    pub fn new(
        sql: Arc<dyn openfeed_sql::SQLStore>,
        config: AuthConfig,
    ) -> Result<Self, openfeed_core::ServiceError> {
        let service = AuthService::new(sql, config).map_err(openfeed_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
