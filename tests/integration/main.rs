//! End-to-end tests against a real listener.
//!
//! Each test binds an ephemeral port on localhost and talks to the server
//! over HTTP with reqwest.

use std::net::SocketAddr;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use devops_app::api::{serve, AppState};
use devops_app::config::Config;

/// Start the service on a random port and return its base URL.
async fn spawn_server(config: Config) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        serve(listener, AppState::new(config), std::future::pending::<()>())
            .await
            .expect("server error");
    });

    format!("http://{}", addr)
}

fn is_iso_timestamp(value: &Value) -> bool {
    value
        .as_str()
        .and_then(|s| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .is_some()
}

#[tokio::test]
async fn health_check_over_http() {
    let base = spawn_server(Config::default()).await;

    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "devops-app");
    assert_eq!(body["version"], "1.0.0");
    assert!(is_iso_timestamp(&body["timestamp"]));
}

#[tokio::test]
async fn info_has_name_and_version() {
    let config = Config {
        app_version: "9.9.9".to_string(),
        ..Config::default()
    };
    let base = spawn_server(config).await;

    let response = reqwest::get(format!("{base}/api/v1/info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert!(!body["app_name"].as_str().unwrap().is_empty());
    assert_eq!(body["version"], "9.9.9");
    assert!(body["python_version"].is_string());
}

#[tokio::test]
async fn echo_round_trips_json() {
    let base = spawn_server(Config::default()).await;
    let payload = json!({"test": "data", "value": 123});

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/echo"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Echo successful");
    assert_eq!(body["received_data"], payload);
    assert!(is_iso_timestamp(&body["timestamp"]));
}

#[tokio::test]
async fn echo_without_body_is_empty_object() {
    let base = spawn_server(Config::default()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/v1/echo"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["received_data"], json!({}));
}

#[tokio::test]
async fn metrics_is_constant() {
    let base = spawn_server(Config::default()).await;

    for _ in 0..3 {
        let body: Value = reqwest::get(format!("{base}/api/v1/metrics"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(
            body,
            json!({"requests_processed": 0, "uptime": "N/A", "memory_usage": "N/A"})
        );
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let base = spawn_server(Config::default()).await;

    let response = reqwest::get(format!("{base}/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serve_returns_after_shutdown() {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, AppState::default(), async {
        rx.await.ok();
    }));

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    tx.send(()).unwrap();
    let result = server.await.unwrap();
    assert!(result.is_ok());
}
