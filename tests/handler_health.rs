mod common;

use request_cache::application::CacheHandle;

#[tokio::test]
async fn test_health_endpoint_success() {
    let cache = common::create_test_handle().await;
    let server = common::create_test_server(cache);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_disconnected() {
    let server = common::create_test_server(CacheHandle::new(None, None));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}
