//! Feed module — posts, likes, and follows.
//!
//! # Resources
//!
//! - **Post** — user-authored content; mutable and deletable only by its owner
//! - **Connection** — a user's social graph record, created lazily on first
//!   access; its `following` set filters the following-feed
//! - **Likes** — per-post membership set of user ids, flipped by toggling
//!
//! # Usage
//!
//! ```ignore
//! use feed::FeedModule;
//!
//! let module = FeedModule::new(sql)?;
//! let router = module.routes(); // Mount at the application root
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use openfeed_core::Module;

use crate::service::FeedService;

/// Feed module implementing the Module trait.
pub struct FeedModule {
    service: Arc<FeedService>,
}

impl FeedModule {
    /// Create a new FeedModule.
    pub fn new(
        sql: Arc<dyn openfeed_sql::SQLStore>,
    ) -> Result<Self, openfeed_core::ServiceError> {
        let service = FeedService::new(sql).map_err(openfeed_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying FeedService.
    pub fn service(&self) -> &Arc<FeedService> {
        &self.service
    }
}

impl Module for FeedModule {
    fn name(&self) -> &str {
        "feed"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
