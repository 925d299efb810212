//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use shopwright_core::StoreTemplate;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub templates: [StoreTemplate; 3],
}

pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        user,
        templates: StoreTemplate::ALL,
    }
}
