//! Public storefront pages and the visitor cart.

use axum::http::StatusCode;
use serde_json::{Value, json};

use shopwright_integration_tests::TestApp;

/// A seller store with one featured and one plain product. Returns the
/// store JSON and the two store product ids.
async fn stocked_store(app: &mut TestApp, template: &str) -> (Value, i64, i64) {
    let case = app.seed_product("CASE-1", "Phone Case", 2499).await;
    let cable = app.seed_product("CABLE-1", "USB Cable", 999).await;
    app.sign_up("seller@example.com").await;
    let store = app
        .create_store(&json!({ "name": "My Awesome Store", "template": template }))
        .await;
    let path = format!("/api/stores/{}/products", store["id"]);

    let featured = app
        .post_json(
            &path,
            &json!({ "product_id": case.id, "custom_price": "19.99", "is_featured": true }),
        )
        .await
        .json();
    let plain = app
        .post_json(&path, &json!({ "product_id": cable.id }))
        .await
        .json();

    app.forget_session();
    (
        store,
        featured["id"].as_i64().expect("featured id"),
        plain["id"].as_i64().expect("plain id"),
    )
}

#[tokio::test]
async fn test_storefront_renders_template_and_sections() {
    let mut app = TestApp::new();
    stocked_store(&mut app, "bold").await;

    let page = app.get("/s/my-awesome-store").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(html.contains("tpl-bold"));
    assert!(html.contains(r#"id="featured""#));
    assert!(html.contains(r#"id="all-products""#));
    assert!(html.contains("$19.99"));
    assert!(html.contains("USB Cable"));
    assert!(html.contains("$9.99"));
}

#[tokio::test]
async fn test_featuring_moves_product_out_of_regular_list() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 1999).await;
    app.sign_up("seller@example.com").await;
    let store = app.create_store(&json!({ "name": "Solo Shop" })).await;
    let base = format!("/api/stores/{}/products", store["id"]);

    let entry = app
        .post_json(&base, &json!({ "product_id": product.id }))
        .await
        .json();
    assert_eq!(entry["effective_price"], "19.99");
    assert_eq!(entry["is_featured"], false);

    let html = app.get("/s/solo-shop").await.text();
    assert!(!html.contains(r#"id="featured""#));
    assert_eq!(section_of(&html, "Phone Case"), Some("all-products"));

    let featured = app
        .put_json(
            &format!("{base}/{}", entry["id"]),
            &json!({ "is_featured": true }),
        )
        .await;
    assert_eq!(featured.status, StatusCode::OK);
    assert_eq!(featured.json()["is_featured"], true);

    app.forget_session();
    let html = app.get("/s/solo-shop").await.text();
    assert_eq!(section_of(&html, "Phone Case"), Some("featured"));
    assert_eq!(html.matches("?product=").count(), 1);
    assert!(html.contains("$19.99"));
}

/// Which storefront section the first mention of `needle` falls in.
fn section_of(html: &str, needle: &str) -> Option<&'static str> {
    let at = html.find(needle)?;
    ["featured", "all-products"]
        .into_iter()
        .filter_map(|id| html.find(&format!(r#"id="{id}""#)).map(|pos| (pos, id)))
        .filter(|(pos, _)| *pos < at)
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, id)| id)
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let mut app = TestApp::new();

    let page = app.get("/s/does-not-exist").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);

    let api = app.get("/api/stores/public/does-not-exist").await;
    assert_eq!(api.status, StatusCode::NOT_FOUND);
    assert_eq!(api.json()["message"], "Store not found");
}

#[tokio::test]
async fn test_deactivated_store_is_hidden() {
    let mut app = TestApp::new();
    let (store, _, _) = stocked_store(&mut app, "minimal").await;
    app.log_in("seller@example.com").await;
    let updated = app
        .put_json(
            &format!("/api/stores/{}", store["id"]),
            &json!({ "is_active": false }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    app.forget_session();
    assert_eq!(app.get("/s/my-awesome-store").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_detail_view() {
    let mut app = TestApp::new();
    let (_, featured, _) = stocked_store(&mut app, "modern").await;

    let page = app
        .get(&format!("/s/my-awesome-store?product={featured}"))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(html.contains(r#"id="detail""#));
    assert!(html.contains("Phone Case description"));
}

#[tokio::test]
async fn test_add_to_cart_keeps_visitor_cart() {
    let mut app = TestApp::new();
    let (_, featured, plain) = stocked_store(&mut app, "modern").await;

    for id in [featured, plain] {
        let added = app
            .post_form("/s/my-awesome-store/cart", &[("product_id", &id.to_string())])
            .await;
        assert_eq!(added.status, StatusCode::SEE_OTHER);
        assert_eq!(
            added.location(),
            Some(format!("/s/my-awesome-store?added={id}").as_str())
        );
    }

    let notice = app
        .get(&format!("/s/my-awesome-store?added={featured}"))
        .await
        .text();
    assert!(notice.contains("Added Phone Case to your cart."));

    let html = app.get("/s/my-awesome-store").await.text();
    assert!(html.contains("Cart: 2 items"));
    assert!(html.contains("$29.98"));
}

#[tokio::test]
async fn test_add_unknown_product_to_cart() {
    let mut app = TestApp::new();
    stocked_store(&mut app, "modern").await;

    let refused = app
        .post_form("/s/my-awesome-store/cart", &[("product_id", "9999")])
        .await;
    assert_eq!(refused.status, StatusCode::SEE_OTHER);
    assert_eq!(refused.location(), Some("/s/my-awesome-store"));

    let html = app.get("/s/my-awesome-store").await.text();
    assert!(html.contains("Cart: 0 items"));
}

#[tokio::test]
async fn test_cart_notice_only_names_products_in_the_store() {
    let mut app = TestApp::new();
    stocked_store(&mut app, "modern").await;

    let page = app.get("/s/my-awesome-store?added=9999&error=9999").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(!html.contains("to your cart."));
    assert!(!html.contains("is out of stock."));

    let forged = app
        .get("/s/my-awesome-store?added=Free%20gift%20card")
        .await;
    assert!(!forged.text().contains("Free gift card"));
}
