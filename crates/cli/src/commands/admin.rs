//! User management.

use thiserror::Error;

use shopwright_storefront::db::PgRepository;
use shopwright_storefront::services::{AuthError, AuthService};

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("No user registered with email: {0}")]
    UnknownUser(String),

    #[error(transparent)]
    Auth(AuthError),
}

/// Promote the user with `email` to admin.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if nobody registered with that email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let pool = connect().await?;
    let repo = PgRepository::new(pool);

    let user = AuthService::new(&repo)
        .promote_by_email(email)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AdminError::UnknownUser(email.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!(user_id = %user.id, email = %user.email, "User promoted to admin");
    Ok(())
}
