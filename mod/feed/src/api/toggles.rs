use axum::extract::{Extension, Path, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use openfeed_core::{CurrentUser, ServiceError};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/like-home/{id}", get(like_home))
        .route("/like-detail/{id}", get(like_detail))
        .route("/follow-home/{id}", get(follow_home))
        .route("/follow-detail/{id}", get(follow_detail))
}

/// Where a toggle redirects once it completes.
#[derive(Debug, Clone, Copy)]
enum ReturnTo {
    Home,
    Detail,
}

impl ReturnTo {
    fn location(self, post_id: &str) -> String {
        match self {
            ReturnTo::Home => "/".to_string(),
            ReturnTo::Detail => format!("/detail/{}", post_id),
        }
    }
}

async fn toggle_like(
    svc: AppState,
    user: CurrentUser,
    post_id: String,
    back: ReturnTo,
) -> Result<Redirect, ServiceError> {
    svc.toggle_like(&post_id, &user.id)
        .map_err(ServiceError::from)?;
    Ok(Redirect::to(&back.location(&post_id)))
}

async fn toggle_follow(
    svc: AppState,
    user: CurrentUser,
    post_id: String,
    back: ReturnTo,
) -> Result<Redirect, ServiceError> {
    svc.toggle_follow(&user.id, &post_id)
        .map_err(ServiceError::from)?;
    Ok(Redirect::to(&back.location(&post_id)))
}

/// GET /like-home/{id} — toggle like, back to the home feed.
async fn like_home(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    toggle_like(svc, user, id, ReturnTo::Home).await
}

/// GET /like-detail/{id} — toggle like, back to the post.
async fn like_detail(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    toggle_like(svc, user, id, ReturnTo::Detail).await
}

/// GET /follow-home/{id} — toggle follow of the post's owner, back to the home feed.
async fn follow_home(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    toggle_follow(svc, user, id, ReturnTo::Home).await
}

/// GET /follow-detail/{id} — toggle follow of the post's owner, back to the post.
async fn follow_detail(
    State(svc): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, ServiceError> {
    toggle_follow(svc, user, id, ReturnTo::Detail).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_to_locations() {
        assert_eq!(ReturnTo::Home.location("abc"), "/");
        assert_eq!(ReturnTo::Detail.location("abc"), "/detail/abc");
    }
}
