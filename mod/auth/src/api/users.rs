use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use openfeed_core::ServiceError;

use crate::api::AppState;
use crate::model::CreateUser;

pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// POST /auth/register — create a new user account.
async fn register(
    State(svc): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let user = svc.register(input).map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(user).unwrap()),
    ))
}
