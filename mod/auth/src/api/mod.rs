mod me;
mod sessions;
mod users;

pub mod middleware;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

pub use middleware::auth_middleware;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the auth API router.
///
/// All routes are relative — the caller nests them under `/auth`.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(users::routes())
        .merge(sessions::routes())
        .merge(me::routes())
        .with_state(svc)
}
