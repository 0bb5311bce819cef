use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use openfeed_core::{CurrentUser, ServiceError};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /auth/me — current user info.
async fn me(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&user.id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user).unwrap()))
}
