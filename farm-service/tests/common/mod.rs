//! Common test utilities for farm-service integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use farm_service::config::FarmConfig;
use farm_service::models::{Flavor, Land, Tac};
use farm_service::services::{FarmStore, InMemoryStore};
use farm_service::startup::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,farm_service=debug,service_core=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Reference data every test starts from: one tac, one customer-owned land
/// and one active flavor.
pub struct Seed {
    pub tac: Tac,
    pub owner_code: Uuid,
    pub land: Land,
    pub flavor: Flavor,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn FarmStore>,
    pub seed: Seed,
}

pub async fn seed(store: &dyn FarmStore) -> Seed {
    let owner_code = Uuid::new_v4();
    let tac = store
        .insert_tac(Tac::new("Test Tac", Uuid::new_v4()))
        .await
        .expect("Failed to seed tac");
    let land = store
        .insert_land(Land::new("North field", tac.pac_code, Some(owner_code)))
        .await
        .expect("Failed to seed land");
    let flavor = store
        .insert_flavor(Flavor::new("Sweet", "Sweet"))
        .await
        .expect("Failed to seed flavor");

    Seed {
        tac,
        owner_code,
        land,
        flavor,
    }
}

/// Router over a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    init_tracing();

    let store: Arc<dyn FarmStore> = Arc::new(InMemoryStore::new());
    let seed = seed(store.as_ref()).await;
    let state = AppState {
        config: FarmConfig::in_memory(),
        store: store.clone(),
    };

    TestApp {
        router: build_router(state),
        store,
        seed,
    }
}

pub fn owner_headers(seed: &Seed, roles: &str) -> Vec<(&'static str, String)> {
    vec![
        ("X-Customer-Code", seed.owner_code.to_string()),
        ("X-Role-Names", roles.to_string()),
    ]
}

pub fn post_json(uri: &str, headers: &[(&'static str, String)], body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn get(uri: &str, headers: &[(&'static str, String)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}

/// Send a request and decode the JSON body (Null for an empty body).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router call failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// `(property, message)` pairs of a 400 validation response.
pub fn validation_errors(body: &Value) -> Vec<(String, String)> {
    body["validation_errors"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|e| {
                    (
                        e["property"].as_str().unwrap_or_default().to_string(),
                        e["message"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
