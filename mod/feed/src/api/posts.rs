use axum::extract::{Extension, Path, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};

use openfeed_core::{CurrentUser, ServiceError};

use crate::api::AppState;
use crate::model::{CreatePost, UpdatePost};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_others))
        .route("/mypost/", get(list_mine))
        .route("/create/", get(create_form).post(create_submit))
        .route("/detail/{id}", get(detail))
        .route("/detail/{id}/update", get(update_form).post(update_submit))
        .route("/detail/{id}/delete", get(delete_confirm).post(delete_submit))
        .route("/follow-list/", get(follow_list))
}

/// GET / — everyone else's posts.
async fn list_others(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let posts = svc.list_others(&user.id).map_err(ServiceError::from)?;
    let items = svc.post_views(posts).map_err(ServiceError::from)?;
    let context = svc.view_context(&user).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": items,
        "context": context,
    })))
}

/// GET /mypost/ — the acting user's own posts.
async fn list_mine(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let posts = svc.list_mine(&user.id).map_err(ServiceError::from)?;
    let items = svc.post_views(posts).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": items,
    })))
}

/// GET /follow-list/ — posts by the users the acting user follows.
async fn follow_list(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let posts = svc.list_following(&user.id).map_err(ServiceError::from)?;
    let items = svc.post_views(posts).map_err(ServiceError::from)?;
    let context = svc.view_context(&user).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": items,
        "context": context,
    })))
}

/// GET /detail/{id} — a single post.
async fn detail(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let post = svc.get_post(&id).map_err(ServiceError::from)?;
    let view = svc.post_view(post).map_err(ServiceError::from)?;
    let context = svc.view_context(&user).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "post": view,
        "context": context,
    })))
}

/// GET /create/ — blank form context.
async fn create_form() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "",
        "content": "",
    }))
}

/// POST /create/ — create a post owned by the acting user.
async fn create_submit(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CreatePost>,
) -> Result<Redirect, ServiceError> {
    svc.create_post(&user.id, input).map_err(ServiceError::from)?;
    Ok(Redirect::to("/mypost/"))
}

/// GET /detail/{id}/update — current values as form context. Owner only.
async fn update_form(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let post = svc.editable_post(&id, &user.id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(post).unwrap()))
}

/// POST /detail/{id}/update — edit title/content. Owner only.
async fn update_submit(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePost>,
) -> Result<Redirect, ServiceError> {
    svc.update_post(&id, &user.id, input)
        .map_err(ServiceError::from)?;
    Ok(Redirect::to(&format!("/detail/{}", id)))
}

/// GET /detail/{id}/delete — confirmation context. Owner only.
async fn delete_confirm(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let post = svc.editable_post(&id, &user.id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(post).unwrap()))
}

/// POST /detail/{id}/delete — remove the post. Owner only.
async fn delete_submit(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    svc.delete_post(&id, &user.id).map_err(ServiceError::from)?;
    Ok(Redirect::to("/mypost/"))
}
