//! Collection import/export tests, including dispatch of imported requests.

use super::client_with;
use rest_client_pipeline::collection::{
    import_collection, load_collection, save_collection, Collection, SavedRequest,
};
use rest_client_pipeline::config::RestClientConfig;
use rest_client_pipeline::models::{AuthConfig, HttpMethod, RequestBody, RequestConfig};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_collection_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("orders.json");

    let mut collection = Collection::new("Orders");
    collection.requests.push(SavedRequest::from_request_config(
        "Create order",
        &RequestConfig::new(HttpMethod::POST, "https://shop.example.com/orders")
            .with_body(RequestBody::Json(json!({"sku": "A-1", "qty": 2})))
            .with_auth(AuthConfig::Basic {
                username: "clerk".to_string(),
                password: "pw".to_string(),
            }),
    ));

    save_collection(&collection, &file_path).unwrap();
    let loaded = load_collection(&file_path).unwrap();

    assert_eq!(loaded, collection);
    assert_eq!(
        loaded.requests[0].to_request_config().body,
        Some(RequestBody::Json(json!({"sku": "A-1", "qty": 2})))
    );
}

#[tokio::test]
async fn test_imported_thunder_request_is_dispatched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("Authorization", "Bearer token"))
        .and(body_string_contains("q=cats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let export = json!({
        "clientName": "Thunder Client",
        "collectionName": "Search",
        "requests": [{
            "_id": "s1",
            "name": "Search cats",
            "method": "POST",
            "url": format!("{}/search", server.uri()),
            "headers": [{"name": "Accept", "value": "application/json"}],
            "body": {"type": "formencoded", "raw": "q=cats"},
            "auth": {"type": "bearer", "bearer": "{{token}}"}
        }]
    });

    let collection = import_collection(&export.to_string()).unwrap();
    let request = collection.find("s1").unwrap().to_request_config();

    let client = client_with(RestClientConfig::default());
    let response = client.send_request(request).await.unwrap();

    assert_eq!(response.data, json!({"hits": 3}));
    assert_eq!(client.history().len(), 1);
}
