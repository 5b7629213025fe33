// Router-level tests driving every endpoint over an in-memory store

use std::sync::Arc;

use api::{create_router, AppState};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::config::Settings;
use common::db::{BakeryStore, MemoryStore};
use common::errors::DatabaseError;
use common::models::NewBakedGood;
use serde_json::{json, Value};
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

fn app(store: Arc<MemoryStore>) -> Router {
    create_router(AppState::new(store, Settings::default()))
}

/// Corner Oven (id 1) with a Croissant (id 1, 3.5)
async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let bakery = store.insert_bakery("Corner Oven");
    store
        .create_baked_good(NewBakedGood {
            name: "Croissant".to_string(),
            price: 3.5,
            bakery_id: bakery.id,
        })
        .await
        .unwrap();
    store
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, FORM);
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_body(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn multipart(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));
    body
}

async fn send_json(app: &Router, method: Method, uri: &str, form: Option<&str>) -> (StatusCode, Value) {
    let (status, body) = send(app, method, uri, form).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn index_serves_html_banner() {
    let app = app(seeded_store().await);
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>Bakery API</h1>");
}

#[tokio::test]
async fn list_bakeries_returns_array_with_nested_goods() {
    let app = app(seeded_store().await);
    let (status, body) = send_json(&app, Method::GET, "/bakeries", None).await;

    assert_eq!(status, StatusCode::OK);
    let bakeries = body.as_array().unwrap();
    assert_eq!(bakeries.len(), 1);
    assert_eq!(bakeries[0]["id"], 1);
    assert_eq!(bakeries[0]["name"], "Corner Oven");
    assert!(bakeries[0]["created_at"].is_string());
    assert_eq!(bakeries[0]["baked_goods"][0]["name"], "Croissant");
}

#[tokio::test]
async fn get_bakery_by_id() {
    let app = app(seeded_store().await);

    let (status, body) = send_json(&app, Method::GET, "/bakeries/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Corner Oven");

    let (status, body) = send_json(&app, Method::GET, "/bakeries/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Bakery not found"}));
}

#[tokio::test]
async fn non_integer_id_does_not_match() {
    let app = app(seeded_store().await);
    let (status, body) = send_json(&app, Method::GET, "/bakeries/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn patch_bakery_updates_name() {
    let app = app(seeded_store().await);

    let (status, body) =
        send_json(&app, Method::PATCH, "/bakeries/1", Some("name=Dawn+Bakes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Dawn Bakes");

    let (_, body) = send_json(&app, Method::GET, "/bakeries/1", None).await;
    assert_eq!(body["name"], "Dawn Bakes");
}

#[tokio::test]
async fn patch_bakery_without_name_is_rejected() {
    let app = app(seeded_store().await);

    for form in [Some("name="), Some("other=x"), None] {
        let (status, body) = send_json(&app, Method::PATCH, "/bakeries/1", form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Name is required"}));
    }

    let (_, body) = send_json(&app, Method::GET, "/bakeries/1", None).await;
    assert_eq!(body["name"], "Corner Oven");
}

#[tokio::test]
async fn patch_unknown_bakery_is_not_found_before_validation() {
    let app = app(seeded_store().await);
    let (status, body) = send_json(&app, Method::PATCH, "/bakeries/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Bakery not found"}));
}

#[tokio::test]
async fn create_baked_good_returns_created_record() {
    let store = seeded_store().await;
    let app = app(store.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/baked_goods",
        Some("name=Muffin&price=2.0&bakery_id=1"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);
    assert_eq!(body["name"], "Muffin");
    assert_eq!(body["price"], 2.0);
    assert_eq!(body["bakery_id"], 1);
    assert!(body["created_at"].is_string());
    assert_eq!(store.baked_good_count(), 2);

    // Croissant is still the most expensive
    let (status, body) =
        send_json(&app, Method::GET, "/baked_goods/most_expensive", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["price"], 3.5);
}

#[tokio::test]
async fn create_baked_good_with_missing_field_persists_nothing() {
    let store = seeded_store().await;
    let app = app(store.clone());

    for form in [
        Some("price=2.0&bakery_id=1"),
        Some("name=Muffin&bakery_id=1"),
        Some("name=Muffin&price=2.0"),
        Some("name=&price=2.0&bakery_id=1"),
        None,
    ] {
        let (status, body) = send_json(&app, Method::POST, "/baked_goods", form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Missing required fields (name, price, bakery_id)"})
        );
    }
    assert_eq!(store.baked_good_count(), 1);
}

#[tokio::test]
async fn create_baked_good_with_bad_number_is_rejected() {
    let store = seeded_store().await;
    let app = app(store.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/baked_goods",
        Some("name=Muffin&price=cheap&bakery_id=1"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid value for price: 'cheap'"}));
    assert_eq!(store.baked_good_count(), 1);
}

#[tokio::test]
async fn create_baked_good_for_unknown_bakery_surfaces_store_error() {
    let store = seeded_store().await;
    let app = app(store.clone());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/baked_goods",
        Some("name=Muffin&price=2.0&bakery_id=77"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("baked_goods_bakery_id_fkey"));
    assert_eq!(store.baked_good_count(), 1);
}

#[tokio::test]
async fn delete_baked_good() {
    let store = seeded_store().await;
    let app = app(store.clone());

    let (status, body) = send_json(&app, Method::DELETE, "/baked_goods/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Baked good successfully deleted"}));
    assert_eq!(store.baked_good_count(), 0);

    let (status, body) = send_json(&app, Method::DELETE, "/baked_goods/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Baked good not found"}));
}

#[tokio::test]
async fn by_price_is_sorted_descending() {
    let store = seeded_store().await;
    for (name, price) in [("Muffin", 2.0), ("Cake", 12.0), ("Bun", 3.5)] {
        store
            .create_baked_good(NewBakedGood {
                name: name.to_string(),
                price,
                bakery_id: 1,
            })
            .await
            .unwrap();
    }
    let app = app(store);

    let (status, body) = send_json(&app, Method::GET, "/baked_goods/by_price", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cake", "Croissant", "Bun", "Muffin"]);
}

#[tokio::test]
async fn empty_store_listings() {
    let app = app(Arc::new(MemoryStore::new()));

    let (status, body) = send_json(&app, Method::GET, "/baked_goods/by_price", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) =
        send_json(&app, Method::GET, "/baked_goods/most_expensive", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No baked goods found"}));
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let app = app(seeded_store().await);
    let (status, _) = send(&app, Method::GET, "/baked_goods/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = send(&app, Method::DELETE, "/bakeries/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn store_failure_is_reported_as_bad_request() {
    let store = seeded_store().await;
    let app = app(store.clone());
    store.set_offline(true);

    let (status, body) = send_json(&app, Method::GET, "/bakeries", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "store is offline"}));
}

#[tokio::test]
async fn health_reflects_store_availability() {
    let store = seeded_store().await;
    let app = app(store.clone());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    store.set_offline(true);
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_disabled_by_default() {
    let app = app(seeded_store().await);
    let (status, _) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn json_is_indented_unless_disabled() {
    let store = seeded_store().await;

    let (_, pretty) = send(
        &app(store.clone()),
        Method::GET,
        "/baked_goods/most_expensive",
        None,
    )
    .await;
    assert!(pretty.starts_with("{\n  \"id\": 1,"));
    assert!(pretty.contains("\n  \"bakery_id\": 1"));

    let mut settings = Settings::default();
    settings.server.pretty_json = false;
    let compact_app = create_router(AppState::new(store, settings));
    let (_, compact) =
        send(&compact_app, Method::GET, "/baked_goods/most_expensive", None).await;
    assert!(!compact.contains('\n'));
    assert!(compact.starts_with("{\"id\":1"));
}

#[tokio::test]
async fn error_bodies_follow_json_formatting() {
    let store = seeded_store().await;

    let (_, pretty) = send(&app(store.clone()), Method::GET, "/bakeries/99", None).await;
    assert_eq!(pretty, "{\n  \"error\": \"Bakery not found\"\n}");

    let (_, pretty) = send(&app(store.clone()), Method::GET, "/no/such/path", None).await;
    assert_eq!(pretty, "{\n  \"error\": \"Not found\"\n}");

    let mut settings = Settings::default();
    settings.server.pretty_json = false;
    let compact_app = create_router(AppState::new(store, settings));
    let (_, compact) = send(&compact_app, Method::GET, "/bakeries/99", None).await;
    assert_eq!(compact, r#"{"error":"Bakery not found"}"#);
}

#[tokio::test]
async fn large_listings_are_served_in_full() {
    let store = Arc::new(MemoryStore::new());
    let bakery = store.insert_bakery("Corner Oven");
    let name = "x".repeat(200);
    for i in 0..90_000 {
        store
            .create_baked_good(NewBakedGood {
                name: name.clone(),
                price: f64::from(i % 1000),
                bakery_id: bakery.id,
            })
            .await
            .unwrap();
    }
    let app = app(store);

    let (status, body) = send(&app, Method::GET, "/baked_goods/by_price", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.len() > 16 * 1024 * 1024);
    let listed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 90_000);

    let (status, body) = send_json(&app, Method::GET, "/bakeries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["baked_goods"].as_array().unwrap().len(), 90_000);
}

#[tokio::test]
async fn non_finite_price_is_rejected() {
    let store = seeded_store().await;
    let app = app(store.clone());

    for price in ["inf", "nan", "-inf"] {
        let form = format!("name=Muffin&price={}&bakery_id=1", price);
        let (status, body) = send_json(&app, Method::POST, "/baked_goods", Some(&form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": format!("Invalid value for price: '{}'", price)})
        );
    }
    assert_eq!(store.baked_good_count(), 1);

    let (_, body) = send_json(&app, Method::GET, "/baked_goods/most_expensive", None).await;
    assert_eq!(body["price"], 3.5);
}

#[tokio::test]
async fn repeated_form_key_uses_first_value() {
    let app = app(seeded_store().await);

    let (status, body) =
        send_json(&app, Method::PATCH, "/bakeries/1", Some("name=A&name=B")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");
}

#[tokio::test]
async fn multipart_forms_are_accepted() {
    let store = seeded_store().await;
    let app = app(store.clone());
    let content_type = "multipart/form-data; boundary=BakeryBoundary";

    let (status, body) = send_body(
        &app,
        Method::PATCH,
        "/bakeries/1",
        content_type,
        multipart("BakeryBoundary", &[("name", "Dawn")]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dawn");

    let (status, body) = send_body(
        &app,
        Method::POST,
        "/baked_goods",
        content_type,
        multipart(
            "BakeryBoundary",
            &[("name", "Scone"), ("price", "2.75"), ("bakery_id", "1")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Scone");
    assert_eq!(body["price"], 2.75);
    assert_eq!(store.baked_good_count(), 2);

    let (status, body) = send_body(
        &app,
        Method::POST,
        "/baked_goods",
        content_type,
        multipart("BakeryBoundary", &[("name", "Scone")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Missing required fields (name, price, bakery_id)"})
    );
}

#[tokio::test]
async fn rename_store_failure_is_reported_and_nothing_changes() {
    let store = seeded_store().await;
    let app = app(store.clone());
    store.fail_next_mutation(DatabaseError::QueryFailed(
        "could not serialize access".to_string(),
    ));

    let (status, body) =
        send_json(&app, Method::PATCH, "/bakeries/1", Some("name=Dawn")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "could not serialize access"}));

    let (_, body) = send_json(&app, Method::GET, "/bakeries/1", None).await;
    assert_eq!(body["name"], "Corner Oven");
}
