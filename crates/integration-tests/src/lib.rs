//! Integration tests for Shopwright.
//!
//! Every test drives the real router from `shopwright_storefront::build_app`
//! in-process, backed by the in-memory repository and session store, so no
//! database or running server is needed:
//!
//! ```bash
//! cargo test -p shopwright-integration-tests
//! ```
//!
//! [`TestApp`] keeps the session cookie between requests the way a browser
//! would, and exposes the repository for seeding catalog data.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use shopwright_core::{NewProduct, Price, Product, UserId, UserRole};
use shopwright_storefront::build_app;
use shopwright_storefront::config::StorefrontConfig;
use shopwright_storefront::db::{CatalogRepository, MemoryRepository, Repository, UserRepository};
use shopwright_storefront::middleware::memory_session_layer;
use shopwright_storefront::state::AppState;

/// Password used for every account the harness creates.
pub const PASSWORD: &str = "correct-horse-battery";

/// The application plus one visitor's cookie jar.
pub struct TestApp {
    router: Router,
    repo: Arc<MemoryRepository>,
    cookie: Option<String>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// The body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// A fresh application with empty storage and no session.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let base_url = Url::parse("http://localhost:3000").expect("valid base url");
        let config = StorefrontConfig::in_memory(base_url);
        let session_layer = memory_session_layer(&config);
        let repo = Arc::new(MemoryRepository::new());
        let shared: Arc<dyn Repository> = repo.clone();
        let state = AppState::new(config, shared, None).expect("in-memory app state builds");

        Self {
            router: build_app(state, session_layer),
            repo,
            cookie: None,
        }
    }

    /// The repository behind the app, for seeding and assertions.
    #[must_use]
    pub fn repo(&self) -> &MemoryRepository {
        &self.repo
    }

    /// Drop the session cookie, as a new anonymous visitor.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    /// Send a request, carrying and updating the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, Body::empty()).await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put_json(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.send_json(Method::PUT, uri, body).await
    }

    async fn send_json(&mut self, method: Method, uri: &str, body: &Value) -> TestResponse {
        self.send(
            method,
            uri,
            Some("application/json"),
            Body::from(body.to_string()),
        )
        .await
    }

    /// Submit an HTML form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Method::POST,
            uri,
            Some("application/x-www-form-urlencoded"),
            Body::from(encoded),
        )
        .await
    }

    /// Register through the API and log in. Returns the user JSON.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails.
    pub async fn sign_up(&mut self, email: &str) -> Value {
        let credentials = json!({ "email": email, "password": PASSWORD });
        let registered = self.post_json("/api/auth/register", &credentials).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.text());

        self.log_in(email).await
    }

    /// Log in through the API, replacing any current session.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn log_in(&mut self, email: &str) -> Value {
        let credentials = json!({ "email": email, "password": PASSWORD });
        let login = self.post_json("/api/auth/login", &credentials).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text());
        login.json()
    }

    /// Grant the admin role directly in storage. The user has to log in
    /// again for the session to pick it up.
    ///
    /// # Panics
    ///
    /// Panics if `user` has no numeric id or the user does not exist.
    pub async fn grant_admin(&self, user: &Value) {
        let id = user["id"]
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .expect("user json has an id");
        self.repo
            .set_user_role(UserId::new(id), UserRole::Admin)
            .await
            .expect("user exists");
    }

    /// Create a store through the API. Returns the store JSON.
    ///
    /// # Panics
    ///
    /// Panics unless the store is created.
    pub async fn create_store(&mut self, body: &Value) -> Value {
        let response = self.post_json("/api/stores", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }

    /// Insert a catalog product directly.
    ///
    /// # Panics
    ///
    /// Panics if the sku is already taken.
    pub async fn seed_product(&self, sku: &str, name: &str, retail_cents: u32) -> Product {
        self.repo
            .create_product(product_input(sku, name, retail_cents))
            .await
            .expect("seed product")
    }
}

/// A valid catalog product with the given retail price.
#[must_use]
pub fn product_input(sku: &str, name: &str, retail_cents: u32) -> NewProduct {
    NewProduct {
        sku: sku.to_owned(),
        name: name.to_owned(),
        description: Some(format!("{name} description")),
        category: "Accessories".to_owned(),
        subcategory: None,
        cost_price: Price::from_cents(retail_cents / 4),
        base_price: Price::from_cents(retail_cents / 2),
        suggested_retail: Price::from_cents(retail_cents),
        stock_quantity: 50,
        low_stock_threshold: 10,
        image_url: None,
        images: Vec::new(),
        tags: Vec::new(),
        demand_score: 0.5,
        margin_potential: 0.3,
    }
}
