use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use openfeed_core::CurrentUser;

use crate::api::AppState;

/// Paths that don't require authentication.
const PUBLIC_PATHS: &[&str] = &[
    "/auth/register",
    "/auth/login",
    "/health",
    "/version",
];

/// Bearer-token authentication middleware.
///
/// Verifies the JWT (signature, expiry, session revocation) and stores a
/// [`CurrentUser`] in the request extensions for handlers to consume.
/// Public paths (register, login, health, version) pass through.
pub async fn auth_middleware(
    State(svc): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let token = match extract_bearer(request.headers()) {
        Some(t) => t.to_string(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "code": "UNAUTHENTICATED",
                    "message": "missing authorization header",
                })),
            )
                .into_response();
        }
    };

    match svc.verify_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(CurrentUser {
                id: claims.sub,
                name: claims.name,
                session_id: claims.sid,
            });
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path, "rejected token: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "code": "UNAUTHENTICATED",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Check if a path is public (no auth required).
fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/health"));
        assert!(!is_public_path("/"));
        assert!(!is_public_path("/auth/me"));
        assert!(!is_public_path("/mypost/"));
    }
}
