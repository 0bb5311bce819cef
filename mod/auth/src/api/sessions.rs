use axum::extract::{Extension, State};
use axum::routing::post;
use axum::{Json, Router};

use openfeed_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::Credentials;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// POST /auth/login — verify credentials, issue an access token.
async fn login(
    State(svc): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tokens = svc.login(&credentials).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(tokens).unwrap()))
}

/// POST /auth/logout — revoke the current session.
async fn logout(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<axum::http::StatusCode, ServiceError> {
    svc.revoke_session(&user.session_id)
        .map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
