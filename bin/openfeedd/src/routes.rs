//! Route registration — module routes + system endpoints.

use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use openfeed_core::Module;

/// Build the complete router with all routes.
///
/// The auth module is nested under `/auth`; the feed module's routes are
/// the site itself and mount at the root. The auth middleware wraps
/// everything — public paths are excluded inside the middleware.
pub fn build_router(auth_module: &auth::AuthModule, feed_module: &feed::FeedModule) -> Router {
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    Router::new()
        .nest(&format!("/{}", auth_module.name()), auth_module.routes())
        .merge(feed_module.routes())
        .merge(system_routes)
        .layer(middleware::from_fn_with_state(
            auth_module.service().clone(),
            auth::api::auth_middleware,
        ))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "openfeedd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
