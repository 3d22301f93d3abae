//! HTTP API tests over the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{get, owner_headers, post_json, send, spawn_app, validation_errors, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn add_plant(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let uri = format!("/api/v1/land/{}/add-plant", app.seed.land.code);
    send(&app.router, post_json(&uri, &owner_headers(&app.seed, ""), body)).await
}

#[tokio::test]
async fn health_and_ready() {
    let app = spawn_app().await;

    let (status, body) = send(&app.router, get("/health", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app.router, get("/ready", &[])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn add_plant_returns_codes() {
    let app = spawn_app().await;

    let (status, body) = add_plant(
        &app,
        json!({
            "flavorCode": app.seed.flavor.code,
            "someIntVal": 5,
            "someMoneyVal": "19.99",
            "isEditAllowed": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["landCode"], app.seed.land.code.to_string());
    assert!(body["plantCode"].as_str().is_some());
}

#[tokio::test]
async fn add_plant_validation_errors_are_listed() {
    let app = spawn_app().await;
    let uri = format!("/api/v1/land/{}/add-plant", app.seed.land.code);
    let stranger = vec![("X-Customer-Code", Uuid::new_v4().to_string())];

    let (status, body) = send(&app.router, post_json(&uri, &stranger, json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        validation_errors(&body),
        vec![
            ("flavorCode".to_string(), "Please select a Flavor".to_string()),
            ("".to_string(), "Unautorized access.  Invalid Land.".to_string()),
        ]
    );
}

#[tokio::test]
async fn unknown_land_is_not_found() {
    let app = spawn_app().await;
    let uri = format!("/api/v1/land/{}/add-plant", Uuid::new_v4());

    let (status, _) = send(
        &app.router,
        post_json(&uri, &owner_headers(&app.seed, ""), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_customer_header_is_bad_request() {
    let app = spawn_app().await;
    let uri = format!("/api/v1/land/{}/add-plant", app.seed.land.code);
    let headers = vec![("X-Customer-Code", "nope".to_string())];

    let (status, _) = send(&app.router, post_json(&uri, &headers, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_delete_needs_role_then_succeeds() {
    let app = spawn_app().await;
    let (_, created) = add_plant(&app, json!({ "flavorCode": app.seed.flavor.code })).await;
    let plant_code = created["plantCode"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/plant/{}/user-delete", plant_code);

    let (status, body) = send(
        &app.router,
        post_json(&uri, &owner_headers(&app.seed, ""), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        validation_errors(&body),
        vec![("".to_string(), "Unautorized access. User role not found.".to_string())]
    );

    let (status, body) = send(
        &app.router,
        post_json(&uri, &owner_headers(&app.seed, "User"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["landCode"], app.seed.land.code.to_string());

    let (status, _) = send(
        &app.router,
        post_json(&uri, &owner_headers(&app.seed, "User"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_and_login_anonymously() {
    let app = spawn_app().await;
    let register_uri = format!("/api/v1/tac/{}/register", app.seed.tac.code);
    let login_uri = format!("/api/v1/tac/{}/login", app.seed.tac.code);

    let (status, body) = send(
        &app.router,
        post_json(
            &register_uri,
            &[],
            json!({
                "email": "sam@example.com",
                "password": "pw",
                "confirmPassword": "pw",
                "firstName": "Sam",
                "lastName": "Field"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["userName"], "Sam Field");
    let customer_code = body["customerCode"].clone();

    let (status, body) = send(
        &app.router,
        post_json(&login_uri, &[], json!({ "email": "sam@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        validation_errors(&body),
        vec![("".to_string(), "Invalid Login.".to_string())]
    );

    let (status, body) = send(
        &app.router,
        post_json(&login_uri, &[], json!({ "email": "sam@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["customerCode"], customer_code);
    assert_eq!(body["roleNameCsv"], "User");
}

#[tokio::test]
async fn register_with_empty_body_lists_required_fields() {
    let app = spawn_app().await;
    let uri = format!("/api/v1/tac/{}/register", app.seed.tac.code);

    let (status, body) = send(&app.router, post_json(&uri, &[], json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let properties: Vec<String> = validation_errors(&body).into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        properties,
        vec!["email", "password", "confirmPassword", "firstName", "lastName"]
    );
}

#[tokio::test]
async fn metrics_exposed_after_flow() {
    let app = spawn_app().await;
    add_plant(&app, json!({ "flavorCode": app.seed.flavor.code })).await;

    let response = send(&app.router, get("/metrics", &[])).await;
    assert_eq!(response.0, StatusCode::OK);
}
