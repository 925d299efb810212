//! Login, registration and logout pages.
//!
//! Form posts redirect back to the form with an `?error=` code on failure;
//! the code is turned into a message when the page renders.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub full_name: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<&'static str>,
}

fn error_text(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "disabled" => "This account has been disabled.",
        "password_mismatch" => "Passwords do not match.",
        "weak_password" => "Password must be at least 8 characters.",
        "invalid_email" => "Enter a valid email address.",
        "email_taken" => "An account with this email already exists.",
        "session" => "Could not start a session. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

fn success_text(code: &str) -> &'static str {
    match code {
        "logged_out" => "You have been logged out.",
        _ => "Done.",
    }
}

/// Put the user in the session and tag Sentry with them.
async fn start_session(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

// =============================================================================
// Login
// =============================================================================

pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/stores").into_response();
    }
    LoginTemplate {
        user,
        error: query.error.as_deref().map(error_text),
        success: query.success.as_deref().map(success_text),
    }
    .into_response()
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let user = match AuthService::new(state.repo())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::AccountDisabled) => return Redirect::to("/auth/login?error=disabled"),
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return Redirect::to("/auth/login?error=credentials");
        }
    };

    if let Err(e) = start_session(&session, &user).await {
        tracing::error!(error = %e, "Failed to set session");
        return Redirect::to("/auth/login?error=session");
    }
    Redirect::to("/stores")
}

// =============================================================================
// Registration
// =============================================================================

pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/stores").into_response();
    }
    RegisterTemplate {
        user,
        error: query.error.as_deref().map(error_text),
    }
    .into_response()
}

/// Create the account and log straight in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Redirect {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch");
    }

    let user = match AuthService::new(state.repo())
        .register(&form.email, &form.password, form.full_name.as_deref())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let code = match e {
                AuthError::UserAlreadyExists => "email_taken",
                AuthError::WeakPassword(_) => "weak_password",
                AuthError::InvalidEmail(_) => "invalid_email",
                _ => "failed",
            };
            return Redirect::to(&format!("/auth/register?error={code}"));
        }
    };

    if let Err(e) = start_session(&session, &user).await {
        tracing::error!(error = %e, "Failed to set session after registration");
        return Redirect::to("/auth/login?error=session");
    }
    Redirect::to("/stores")
}

// =============================================================================
// Logout
// =============================================================================

pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();
    Redirect::to("/auth/login?success=logged_out")
}
