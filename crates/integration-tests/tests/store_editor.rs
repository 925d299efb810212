//! The server-rendered store editor: every form posts, redirects back with a
//! `?success=` or `?error=` code, and a failed action changes nothing.

use axum::http::StatusCode;
use serde_json::{Value, json};

use shopwright_integration_tests::{TestApp, TestResponse};

/// Create a store through the editor form and return its id.
async fn create_through_form(app: &mut TestApp, name: &str) -> i64 {
    let created = app
        .post_form(
            "/stores",
            &[
                ("name", name),
                ("description", ""),
                ("template", "modern"),
                ("primary_color", "#6366f1"),
            ],
        )
        .await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    let location = created.location().expect("redirect location").to_string();
    let id = location
        .strip_prefix("/stores/")
        .and_then(|rest| rest.strip_suffix("?success=created"))
        .unwrap_or_else(|| panic!("unexpected redirect {location}"));
    id.parse().expect("numeric store id")
}

fn assert_redirect(response: &TestResponse, expected: &str) {
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.text());
    assert_eq!(response.location(), Some(expected));
}

async fn store_json(app: &mut TestApp, id: i64) -> Value {
    let response = app.get(&format!("/api/stores/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()
}

async fn entries_json(app: &mut TestApp, id: i64) -> Vec<Value> {
    app.get(&format!("/api/stores/{id}/products"))
        .await
        .json()
        .as_array()
        .cloned()
        .expect("entries array")
}

#[tokio::test]
async fn test_template_switch_reaches_storefront() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "My Awesome Store").await;
    assert_eq!(store_json(&mut app, id).await["slug"], "my-awesome-store");

    let switched = app
        .post_form(&format!("/stores/{id}/template"), &[("template", "bold")])
        .await;
    assert_redirect(&switched, &format!("/stores/{id}?success=template"));

    app.forget_session();
    let html = app.get("/s/my-awesome-store").await.text();
    assert!(html.contains("tpl-bold"));
}

#[tokio::test]
async fn test_settings_form_saves_and_deactivates() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Lamp Loft").await;

    let saved = app
        .post_form(
            &format!("/stores/{id}/settings"),
            &[
                ("name", "Lamp Loft Deluxe"),
                ("description", "Warm light"),
                ("primary_color", "#112233"),
                ("logo_url", ""),
                ("banner_url", ""),
            ],
        )
        .await;
    assert_redirect(&saved, &format!("/stores/{id}?success=saved"));

    let store = store_json(&mut app, id).await;
    assert_eq!(store["name"], "Lamp Loft Deluxe");
    assert_eq!(store["slug"], "lamp-loft");
    assert_eq!(store["primary_color"], "#112233");
    assert_eq!(store["is_active"], false);

    let editor = app.get(&format!("/stores/{id}?success=saved")).await;
    assert_eq!(editor.status, StatusCode::OK);
    assert!(editor.text().contains("Settings saved."));
}

#[tokio::test]
async fn test_failed_settings_change_nothing() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Lamp Loft").await;
    let before = store_json(&mut app, id).await;

    let refused = app
        .post_form(
            &format!("/stores/{id}/settings"),
            &[("name", "Lamp Loft"), ("primary_color", "blue"), ("is_active", "on")],
        )
        .await;
    assert_redirect(&refused, &format!("/stores/{id}?error=invalid_store"));
    assert_eq!(store_json(&mut app, id).await, before);

    let editor = app.get(&format!("/stores/{id}?error=invalid_store")).await;
    assert!(editor.text().contains("Check the store name"));
}

#[tokio::test]
async fn test_import_override_feature_and_remove() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Case Closet").await;
    let back = |code: &str| format!("/stores/{id}?success={code}");

    let imported = app
        .post_form(
            &format!("/stores/{id}/products"),
            &[
                ("product_id", &product.id.to_string()),
                ("custom_name", ""),
                ("custom_price", ""),
            ],
        )
        .await;
    assert_redirect(&imported, &back("imported"));
    let entries = entries_json(&mut app, id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["effective_price"], "24.99");
    let sp = entries[0]["id"].as_i64().expect("store product id");

    let updated = app
        .post_form(
            &format!("/stores/{id}/products/{sp}/update"),
            &[("custom_name", "Tough Case"), ("custom_price", "19.99")],
        )
        .await;
    assert_redirect(&updated, &back("updated"));
    let entry = &entries_json(&mut app, id).await[0];
    assert_eq!(entry["effective_name"], "Tough Case");
    assert_eq!(entry["effective_price"], "19.99");

    let featured = app
        .post_form(
            &format!("/stores/{id}/products/{sp}/feature"),
            &[("featured", "true")],
        )
        .await;
    assert_redirect(&featured, &back("featured"));
    assert_eq!(entries_json(&mut app, id).await[0]["is_featured"], true);

    let removed = app
        .post_form(&format!("/stores/{id}/products/{sp}/remove"), &[])
        .await;
    assert_redirect(&removed, &back("removed"));
    assert!(entries_json(&mut app, id).await.is_empty());

    let again = app
        .post_form(&format!("/stores/{id}/products/{sp}/remove"), &[])
        .await;
    assert_redirect(&again, &back("removed"));
}

#[tokio::test]
async fn test_bad_override_price_changes_nothing() {
    let mut app = TestApp::new();
    let product = app.seed_product("CASE-1", "Phone Case", 2499).await;
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Case Closet").await;
    let product_id = product.id.to_string();

    for price in ["abc", "-1", "19.999", "100000000"] {
        let refused = app
            .post_form(
                &format!("/stores/{id}/products"),
                &[("product_id", &product_id), ("custom_price", price)],
            )
            .await;
        assert_redirect(&refused, &format!("/stores/{id}?error=invalid_price"));
    }
    assert!(entries_json(&mut app, id).await.is_empty());

    app.post_form(&format!("/stores/{id}/products"), &[("product_id", &product_id)])
        .await;
    let before = entries_json(&mut app, id).await;
    let sp = before[0]["id"].as_i64().expect("store product id");

    let refused = app
        .post_form(
            &format!("/stores/{id}/products/{sp}/update"),
            &[("custom_name", "Renamed"), ("custom_price", "19.999")],
        )
        .await;
    assert_redirect(&refused, &format!("/stores/{id}?error=invalid_price"));
    assert_eq!(entries_json(&mut app, id).await, before);

    let duplicate = app
        .post_form(&format!("/stores/{id}/products"), &[("product_id", &product_id)])
        .await;
    assert_redirect(&duplicate, &format!("/stores/{id}?error=conflict"));
    assert_eq!(entries_json(&mut app, id).await, before);
}

#[tokio::test]
async fn test_actions_on_another_sellers_store_are_not_found() {
    let mut app = TestApp::new();
    app.sign_up("owner@example.com").await;
    let id = create_through_form(&mut app, "Owned Shop").await;
    let before = store_json(&mut app, id).await;

    app.sign_up("intruder@example.com").await;
    let refused = app
        .post_form(&format!("/stores/{id}/template"), &[("template", "bold")])
        .await;
    assert_redirect(&refused, &format!("/stores/{id}?error=not_found"));

    let editor = app.get(&format!("/stores/{id}")).await;
    assert_redirect(&editor, "/stores?error=not_found");

    app.log_in("owner@example.com").await;
    assert_eq!(store_json(&mut app, id).await, before);
}

#[tokio::test]
async fn test_assistant_reply_is_kept_when_next_question_fails() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Pricing Lab").await;

    let answered = app
        .post_form(
            &format!("/stores/{id}/assistant"),
            &[("message", "How should I price chargers?")],
        )
        .await;
    assert_redirect(&answered, &format!("/stores/{id}?success=answered"));
    let editor = app.get(&format!("/stores/{id}")).await.text();
    assert!(editor.contains("30-50% margins"));

    let refused = app
        .post_form(&format!("/stores/{id}/assistant"), &[("message", "   ")])
        .await;
    assert_redirect(&refused, &format!("/stores/{id}?error=empty_message"));
    let editor = app
        .get(&format!("/stores/{id}?error=empty_message"))
        .await
        .text();
    assert!(editor.contains("30-50% margins"));
    assert!(editor.contains("Type a question for the assistant first."));
}

#[tokio::test]
async fn test_delete_from_editor() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Short Lived").await;

    let deleted = app.post_form(&format!("/stores/{id}/delete"), &[]).await;
    assert_redirect(&deleted, "/stores?success=deleted");
    assert_eq!(
        app.get(&format!("/api/stores/{id}")).await.status,
        StatusCode::NOT_FOUND
    );

    let list = app.get("/stores?success=deleted").await.text();
    assert!(list.contains("Store deleted."));
    assert!(!list.contains("Short Lived"));
}

#[tokio::test]
async fn test_short_name_on_create_redirects_to_list() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;

    let refused = app.post_form("/stores", &[("name", "A")]).await;
    assert_redirect(&refused, "/stores?error=invalid_store");
    let mine = app.get("/api/stores/my").await.json();
    assert_eq!(mine.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_editor_shows_created_store() {
    let mut app = TestApp::new();
    app.sign_up("seller@example.com").await;
    let id = create_through_form(&mut app, "Editor Check").await;

    let html = app.get(&format!("/stores/{id}?success=created")).await.text();
    assert!(html.contains("Store created."));
    assert!(html.contains("Editor Check"));
    assert_eq!(store_json(&mut app, id).await["name"], json!("Editor Check"));
}
