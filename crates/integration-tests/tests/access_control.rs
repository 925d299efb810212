//! Authentication, ownership and admin checks.

use axum::http::StatusCode;
use serde_json::json;

use shopwright_integration_tests::{PASSWORD, TestApp};

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_api_requires_session() {
    let mut app = TestApp::new();

    let response = app.get("/api/stores/my").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["message"], "Not authenticated");

    let create = app.post_json("/api/stores", &json!({ "name": "Sneaky" })).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_redirects_to_login() {
    let mut app = TestApp::new();

    let response = app.get("/stores").await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/auth/login"));
}

#[tokio::test]
async fn test_register_login_me_logout() {
    let mut app = TestApp::new();
    let user = app.sign_up("Seller@Example.com").await;
    assert_eq!(user["email"], "seller@example.com");
    assert_eq!(user["role"], "seller");
    assert!(user.get("password_hash").is_none());

    let me = app.get("/api/auth/me").await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["id"], user["id"]);

    let logout = app.post_json("/api/auth/logout", &json!({})).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(app.get("/api/auth/me").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_and_bad_password() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    app.forget_session();

    let again = app
        .post_json(
            "/api/auth/register",
            &json!({ "email": "seller@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let wrong = app
        .post_json(
            "/api/auth/login",
            &json!({ "email": "seller@example.com", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let weak = app
        .post_json(
            "/api/auth/register",
            &json!({ "email": "other@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_html_login_sets_session() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    app.forget_session();

    let login = app
        .post_form(
            "/auth/login",
            &[("email", "seller@example.com"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(login.location(), Some("/stores"));

    let page = app.get("/stores").await;
    assert_eq!(page.status, StatusCode::OK);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_other_sellers_store_looks_missing() {
    let mut app = TestApp::new();
    app.sign_up("owner@example.com").await;
    let store = app.create_store(&json!({ "name": "Private Shop" })).await;
    let path = format!("/api/stores/{}", store["id"]);

    app.sign_up("intruder@example.com").await;
    assert_eq!(app.get(&path).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put_json(&path, &json!({ "name": "Hijacked" })).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&path).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&format!("{path}/products")).await.status,
        StatusCode::NOT_FOUND
    );

    let public = app.get("/api/stores/public/private-shop").await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.json()["name"], "Private Shop");
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_routes_refuse_sellers() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let analytics = app.get("/api/admin/analytics").await;
    assert_eq!(analytics.status, StatusCode::FORBIDDEN);
    assert_eq!(analytics.json()["message"], "Admin access required");

    let create = app
        .post_json("/api/admin/products", &json!({ "sku": "X" }))
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_manages_catalog() {
    let mut app = TestApp::new();
    let admin = app.sign_up("admin@example.com").await;
    app.grant_admin(&admin).await;
    app.log_in("admin@example.com").await;

    let created = app
        .post_json(
            "/api/admin/products",
            &json!({
                "sku": "LAMP-1",
                "name": "Desk Lamp",
                "category": "Home",
                "cost_price": "9.00",
                "base_price": "15.00",
                "suggested_retail": "29.99",
                "stock_quantity": 4
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.text());
    let product_id = created.json()["id"].as_i64().expect("product id");

    let summary = app.get("/api/admin/analytics").await.json();
    assert_eq!(summary["total_products"], 1);
    assert_eq!(summary["total_users"], 1);
    assert_eq!(summary["low_stock_products"][0]["sku"], "LAMP-1");

    let deleted = app.delete(&format!("/api/admin/products/{product_id}")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["is_active"], false);

    assert_eq!(
        app.get(&format!("/api/products/{product_id}")).await.status,
        StatusCode::NOT_FOUND
    );
    let all = app.get("/api/admin/products?include_inactive=true").await.json();
    assert_eq!(all.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_make_admin_takes_effect_on_next_login() {
    let mut app = TestApp::new();
    let admin = app.sign_up("admin@example.com").await;
    app.grant_admin(&admin).await;
    app.log_in("admin@example.com").await;

    let seller = app.sign_up("seller@example.com").await;
    app.log_in("admin@example.com").await;
    let promoted = app
        .post_json(
            &format!("/api/admin/users/{}/make-admin", seller["id"]),
            &json!({}),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.json()["role"], "admin");

    app.log_in("seller@example.com").await;
    assert_eq!(app.get("/api/admin/analytics").await.status, StatusCode::OK);
}
