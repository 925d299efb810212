//! Authentication extractors.
//!
//! The logged-in user lives in the session under
//! [`keys::CURRENT_USER`](crate::models::session::keys::CURRENT_USER). Pages
//! under `/api/` get JSON 401/403 bodies; HTML pages are redirected to the
//! login form.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::CurrentUser;
use crate::models::session::keys;

/// Extractor that requires a logged-in user.
///
/// ```rust,ignore
/// async fn list_stores(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("stores of {}", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in admin.
pub struct RequireAdmin(pub CurrentUser);

/// Extractor that reads the user if there is one.
pub struct OptionalAuth(pub Option<CurrentUser>);

/// Why an authenticated extractor refused the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// No session user (for API requests).
    Unauthorized,
    /// Logged in but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Not authenticated" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Admin access required" })),
            )
                .into_response(),
        }
    }
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// The path as the client sent it. Nested routers only see the part after
/// their prefix in `parts.uri`.
fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |original| original.0.path())
}

fn missing_user(parts: &Parts) -> AuthRejection {
    let path = request_path(parts);
    if path == "/api" || path.starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        AuthRejection::RedirectToLogin
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session_user(parts).await {
            Some(user) => Ok(Self(user)),
            None => Err(missing_user(parts)),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts).await.ok_or_else(|| missing_user(parts))?;
        if !user.role.is_admin() {
            tracing::warn!(user_id = %user.id, path = %request_path(parts), "admin route refused");
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the user in the session and rotate the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Log out by dropping the whole session, cart included.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(uri: &str, original: Option<&str>) -> Parts {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        if let Some(original) = original {
            parts
                .extensions
                .insert(OriginalUri(original.parse().unwrap()));
        }
        parts
    }

    #[test]
    fn test_nested_api_path_is_unauthorized() {
        let nested = parts("/stores/my", Some("/api/stores/my"));
        assert_eq!(missing_user(&nested), AuthRejection::Unauthorized);
    }

    #[test]
    fn test_html_path_redirects() {
        let page = parts("/1", Some("/stores/1"));
        assert_eq!(missing_user(&page), AuthRejection::RedirectToLogin);
        assert_eq!(
            missing_user(&parts("/apiary", None)),
            AuthRejection::RedirectToLogin
        );
    }

    #[test]
    fn test_falls_back_to_request_uri() {
        assert_eq!(
            missing_user(&parts("/api/auth/me", None)),
            AuthRejection::Unauthorized
        );
    }
}
