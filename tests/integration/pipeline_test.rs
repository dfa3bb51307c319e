//! End-to-end pipeline tests against a local mock server.
//!
//! These tests drive [`RequestClient`] with the reqwest transport, so every
//! request crosses a real socket.

use super::client_with;
use rest_client_pipeline::config::RestClientConfig;
use rest_client_pipeline::executor::ErrorKind;
use rest_client_pipeline::interceptors::{FnInterceptor, RequestOutcome};
use rest_client_pipeline::models::{AuthConfig, HttpMethod, RequestBody, RequestConfig};
use rest_client_pipeline::RetryPolicy;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn caching() -> RestClientConfig {
    RestClientConfig {
        cache_responses: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_successful_request_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    let request = RequestConfig::new(HttpMethod::GET, format!("{}/users", server.uri()))
        .with_param("page", 2i64);

    let response = client.send_request(request.clone()).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.data, json!([{"id": 1}]));

    let history = client.history().get_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].request, request);
    assert_eq!(history[0].status_label(), "200");
}

#[tokio::test]
async fn test_cache_hit_does_not_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"theme": "dark"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(caching());
    let request = RequestConfig::new(HttpMethod::GET, format!("{}/config", server.uri()));

    let first = client.send_request(request.clone()).await.unwrap();
    let second = client.send_request(request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.cache().stats().hits, 1);
    assert_eq!(client.history().len(), 1);
}

#[tokio::test]
async fn test_cache_key_separates_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("items"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_with(caching());
    let url = format!("{}/items", server.uri());

    client
        .send_request(RequestConfig::new(HttpMethod::GET, url.clone()).with_header("Accept", "text/plain"))
        .await
        .unwrap();
    client
        .send_request(RequestConfig::new(HttpMethod::GET, url).with_header("Accept", "text/html"))
        .await
        .unwrap();

    assert_eq!(client.cache().len(), 2);
}

#[tokio::test]
async fn test_not_found_is_an_error_and_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let client = client_with(caching());
    let err = client
        .send_request(RequestConfig::new(
            HttpMethod::GET,
            format!("{}/missing", server.uri()),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(404));
    assert!(client.cache().is_empty());

    let history = client.history().get_history();
    assert_eq!(history.len(), 1);
    assert!(!history[0].is_success());
    assert_eq!(history[0].error().and_then(|e| e.status()), Some(404));
}

#[tokio::test]
async fn test_bearer_and_json_body_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    let request = RequestConfig::new(HttpMethod::POST, format!("{}/users", server.uri()))
        .with_body(RequestBody::Json(json!({"name": "Ada"})))
        .with_auth(AuthConfig::Bearer {
            token: "secret-token".to_string(),
        });

    let response = client.send_request(request).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.data["id"], 7);
}

#[tokio::test]
async fn test_request_hook_header_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trace"))
        .and(header("X-Request-Id", "abc-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    client
        .interceptors()
        .add_request_interceptor(Arc::new(FnInterceptor::request(|config: RequestConfig| {
            Ok(RequestOutcome::Proceed(
                config.with_header("X-Request-Id", "abc-123"),
            ))
        })));

    client
        .send_request(RequestConfig::new(
            HttpMethod::GET,
            format!("{}/trace", server.uri()),
        ))
        .await
        .unwrap();

    // History keeps the request as the caller built it.
    let history = client.history().get_history();
    assert!(history[0].request.header("X-Request-Id").is_none());
}

#[tokio::test]
async fn test_retry_recovers_after_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    let response = client
        .retry_request(
            RequestConfig::new(HttpMethod::GET, format!("{}/flaky", server.uri())),
            RetryPolicy::new(3, Duration::from_millis(5)),
        )
        .await
        .unwrap();

    assert_eq!(response.body_text(), "recovered");

    let history = client.history().get_history();
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().filter(|e| e.is_success()).count(), 1);
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    let err = client
        .send_request(
            RequestConfig::new(HttpMethod::GET, format!("{}/slow", server.uri()))
                .with_timeout(50),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = client_with(RestClientConfig::default());
    let err = client
        .send_request(RequestConfig::new(HttpMethod::GET, "http://127.0.0.1:1/"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(client.history().len(), 1);
}

#[tokio::test]
async fn test_basic_auth_sends_single_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(RestClientConfig::default());
    client
        .send_request(
            RequestConfig::new(HttpMethod::GET, format!("{}/secure", server.uri()))
                .with_header("Authorization", "Bearer stale")
                .with_auth(AuthConfig::Basic {
                    username: "u".to_string(),
                    password: "p".to_string(),
                }),
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let values: Vec<String> = received[0]
        .headers
        .get_all("authorization")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["Basic dTpw".to_string()]);
}

#[tokio::test]
async fn test_cache_hit_with_rewriting_request_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(header("X-Trace", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(caching());
    client
        .interceptors()
        .add_request_interceptor(Arc::new(FnInterceptor::request(|config: RequestConfig| {
            Ok(RequestOutcome::Proceed(config.with_header("X-Trace", "1")))
        })));

    let request = RequestConfig::new(HttpMethod::GET, format!("{}/feed", server.uri()));
    client.send_request(request.clone()).await.unwrap();
    client.send_request(request).await.unwrap();

    let stats = client.cache().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}
