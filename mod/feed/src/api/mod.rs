mod posts;
mod toggles;

use std::sync::Arc;

use axum::Router;

use crate::service::FeedService;

/// Shared application state.
pub type AppState = Arc<FeedService>;

/// Build the feed API router.
///
/// Routes are mounted at the application root — these paths are the
/// public surface of the site.
pub fn build_router(svc: Arc<FeedService>) -> Router {
    Router::new()
        .merge(posts::routes())
        .merge(toggles::routes())
        .with_state(svc)
}
