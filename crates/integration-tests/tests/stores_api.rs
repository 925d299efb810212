//! Store authoring through the JSON API.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use serde_json::json;

use shopwright_integration_tests::TestApp;

// ============================================================================
// Stores
// ============================================================================

#[tokio::test]
async fn test_create_store_derives_slug_and_keeps_template() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let store = app
        .create_store(&json!({ "name": "My Awesome Store", "template": "bold" }))
        .await;

    assert_eq!(store["slug"], "my-awesome-store");
    assert_eq!(store["template"], "bold");
    assert_eq!(store["is_active"], true);
}

#[tokio::test]
async fn test_colliding_names_get_numbered_slugs() {
    let mut app = TestApp::new();
    app.sign_up("first@example.com").await;
    let first = app.create_store(&json!({ "name": "Gadget Hub" })).await;

    app.sign_up("second@example.com").await;
    let second = app.create_store(&json!({ "name": "gadget hub!" })).await;
    let third = app.create_store(&json!({ "name": "Gadget  Hub" })).await;

    assert_eq!(first["slug"], "gadget-hub");
    assert_eq!(second["slug"], "gadget-hub-1");
    assert_eq!(third["slug"], "gadget-hub-2");
}

#[tokio::test]
async fn test_underscores_are_dropped_from_slugs() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let store = app.create_store(&json!({ "name": "a_b shop" })).await;
    assert_eq!(store["slug"], "ab-shop");
    assert_eq!(app.get("/s/ab-shop").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_store_rejects_bad_input() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let short = app.post_json("/api/stores", &json!({ "name": "A" })).await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert!(short.json()["message"].is_string());

    let color = app
        .post_json(
            "/api/stores",
            &json!({ "name": "Colorful", "primary_color": "blue" }),
        )
        .await;
    assert_eq!(color.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_update_and_delete_own_store() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Desk Gear" })).await;
    let id = store["id"].as_i64().expect("store id");

    let mine = app.get("/api/stores/my").await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.json().as_array().map(Vec::len), Some(1));

    let updated = app
        .put_json(
            &format!("/api/stores/{id}"),
            &json!({ "description": "Things for your desk", "primary_color": "#112233" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["description"], "Things for your desk");
    assert_eq!(updated["primary_color"], "#112233");
    assert_eq!(updated["slug"], "desk-gear");

    let deleted = app.delete(&format!("/api/stores/{id}")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/api/stores/{id}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get("/api/stores/public/desk-gear").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_unknown_template_is_stored_and_renders_default() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Neon Nights" })).await;
    let id = store["id"].as_i64().expect("store id");

    let updated = app
        .put_json(&format!("/api/stores/{id}"), &json!({ "template": "neon" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["template"], "neon");

    app.forget_session();
    let page = app.get("/s/neon-nights").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("tpl-modern"));
}

// ============================================================================
// Store products
// ============================================================================

#[tokio::test]
async fn test_import_with_override_and_feature() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;
    let id = store["id"].as_i64().expect("store id");

    let imported = app
        .post_json(
            &format!("/api/stores/{id}/products"),
            &json!({ "product_id": product.id, "custom_price": "19.99", "is_featured": true }),
        )
        .await;
    assert_eq!(imported.status, StatusCode::CREATED, "{}", imported.text());
    let entry = imported.json();
    assert_eq!(entry["effective_price"], "19.99");
    assert_eq!(entry["effective_name"], "Phone Case");
    assert_eq!(entry["is_featured"], true);

    let public = app.get("/api/stores/public/case-closet").await.json();
    let products = public["products"].as_array().expect("products array");
    assert_eq!(products.len(), 1);
    assert_eq!(public["products"][0]["price"], "19.99");
    assert_eq!(public["products"][0]["is_featured"], true);
}

#[tokio::test]
async fn test_clearing_override_restores_catalog_values() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;
    let id = store["id"].as_i64().expect("store id");

    let entry = app
        .post_json(
            &format!("/api/stores/{id}/products"),
            &json!({ "product_id": product.id, "custom_name": "Tough Case", "custom_price": "9.99" }),
        )
        .await
        .json();
    let sp_id = entry["id"].as_i64().expect("store product id");

    let cleared = app
        .put_json(
            &format!("/api/stores/{id}/products/{sp_id}"),
            &json!({ "custom_name": null, "custom_price": null }),
        )
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    let cleared = cleared.json();
    assert_eq!(cleared["effective_name"], "Phone Case");
    assert_eq!(cleared["effective_price"], "24.99");
}

#[tokio::test]
async fn test_duplicate_and_unknown_imports_are_refused() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;
    let path = format!("/api/stores/{}/products", store["id"]);

    let body = json!({ "product_id": product.id });
    assert_eq!(app.post_json(&path, &body).await.status, StatusCode::CREATED);
    assert_eq!(app.post_json(&path, &body).await.status, StatusCode::CONFLICT);

    let unknown = app.post_json(&path, &json!({ "product_id": 9999 })).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.json()["message"], "Product not found");
}

#[tokio::test]
async fn test_import_refuses_prices_the_column_cannot_hold() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;
    let path = format!("/api/stores/{}/products", store["id"]);

    for price in ["abc", "19.999", "100000000", "-1.00"] {
        let response = app
            .post_json(&path, &json!({ "product_id": product.id, "custom_price": price }))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "price {price}");
        assert!(
            response.json()["message"].as_str().is_some_and(|m| !m.is_empty()),
            "price {price}: {}",
            response.text()
        );
    }

    let listed = app.get(&path).await.json();
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let widest = app
        .post_json(&path, &json!({ "product_id": product.id, "custom_price": "99999999.99" }))
        .await;
    assert_eq!(widest.status, StatusCode::CREATED, "{}", widest.text());
    assert_eq!(widest.json()["effective_price"], "99999999.99");
}

#[tokio::test]
async fn test_unknown_store_product_is_named_in_the_error() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;

    let response = app
        .put_json(
            &format!("/api/stores/{}/products/4242", store["id"]),
            &json!({ "is_featured": true }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["message"], "Store product not found");

    let missing_store = app.get("/api/stores/4242").await;
    assert_eq!(missing_store.status, StatusCode::NOT_FOUND);
    assert_eq!(missing_store.json()["message"], "Store not found");
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let response = app
        .send(
            Method::POST,
            "/api/stores",
            Some("application/json"),
            Body::from("{\"name\": "),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].is_string());
}

#[tokio::test]
async fn test_remove_product_is_idempotent() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Case Closet" })).await;
    let id = store["id"].as_i64().expect("store id");

    let entry = app
        .post_json(
            &format!("/api/stores/{id}/products"),
            &json!({ "product_id": product.id }),
        )
        .await
        .json();
    let remove = format!("/api/stores/{id}/products/{}", entry["id"]);

    assert_eq!(app.delete(&remove).await.status, StatusCode::OK);
    assert_eq!(app.delete(&remove).await.status, StatusCode::OK);

    let listed = app.get(&format!("/api/stores/{id}/products")).await.json();
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_browse_is_public() {
    let mut app = TestApp::new();
    app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.seed_product("CABLE-1", "USB Cable", 999).await;

    let all = app.get("/api/products").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.json().as_array().map(Vec::len), Some(2));

    let searched = app.get("/api/products?search=cable").await.json();
    assert_eq!(searched.as_array().map(Vec::len), Some(1));
    assert_eq!(searched[0]["sku"], "CABLE-1");

    let categories = app.get("/api/products/categories/list").await.json();
    assert_eq!(categories, json!(["Accessories"]));
}

// ============================================================================
// Assistant
// ============================================================================

#[tokio::test]
async fn test_chat_uses_keyword_replies_without_api_key() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let reply = app
        .post_json("/api/ai/chat", &json!({ "message": "How should I set my pricing?" }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = reply.json();
    assert!(reply["response"].as_str().is_some_and(|r| r.contains("margins")));
    assert_eq!(reply["action_items"].as_array().map(Vec::len), Some(3));

    let blank = app.post_json("/api/ai/chat", &json!({ "message": "   " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insights_list_high_demand_gaps() {
    let mut app = TestApp::new();
    let mut hot = shopwright_integration_tests::product_input("HOT-1", "Hot Item", 2999);
    hot.demand_score = 0.95;
    let hot = shopwright_storefront::db::CatalogRepository::create_product(app.repo(), hot)
        .await
        .expect("seed hot product");
    app.seed_product("COLD-1", "Cold Item", 999).await;

    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Gap Finder" })).await;

    let insights = app
        .get(&format!("/api/ai/insights/{}", store["id"]))
        .await;
    assert_eq!(insights.status, StatusCode::OK);
    let insights = insights.json();
    assert_eq!(insights["product_gaps"][0]["product_id"], hot.id.as_i32());
    assert_eq!(insights["product_gaps"].as_array().map(Vec::len), Some(1));
    assert_eq!(insights["risks"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_recommend_scores_uncarried_products() {
    let mut app = TestApp::new();
    let mut hot = shopwright_integration_tests::product_input("HOT-1", "Hot Item", 2999);
    hot.demand_score = 0.95;
    let hot = shopwright_storefront::db::CatalogRepository::create_product(app.repo(), hot)
        .await
        .expect("seed hot product");
    app.seed_product("CHG-1", "Travel Charger", 1499).await;
    app.seed_product("CASE-1", "Phone Case", 999).await;

    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Charge Up" })).await;
    let imported = app
        .post_json(
            &format!("/api/stores/{}/products", store["id"]),
            &json!({ "product_id": hot.id }),
        )
        .await;
    assert_eq!(imported.status, StatusCode::CREATED);

    let response = app
        .post_json(
            "/api/ai/recommend",
            &json!({ "query": "charger", "store_id": store["id"] }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    let body = response.json();
    let recommendations = body["recommendations"].as_array().expect("recommendations");
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["name"], "Travel Charger");
    assert_eq!(recommendations[0]["price"], "14.99");
    assert_eq!(recommendations[0]["reason"], "High demand in Accessories");
    assert_eq!(recommendations[1]["name"], "Phone Case");
    assert_eq!(recommendations[1]["reason"], "Good seller");
    assert_eq!(body["insights"], "Found 2 products matching 'charger'");
    assert_eq!(body["suggested_actions"].as_array().map(Vec::len), Some(3));

    app.forget_session();
    let anonymous = app
        .post_json("/api/ai/recommend", &json!({ "query": "charger" }))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
