#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use request_cache::application::CacheHandle;
use request_cache::infrastructure::cache::MemoryStore;
use request_cache::routes::router;
use request_cache::CacheLayer;
use std::time::Duration;

pub async fn create_test_handle() -> CacheHandle {
    CacheHandle::with_store(MemoryStore::new(), None, None)
        .await
        .unwrap()
}

pub async fn create_test_handle_with_max_age(max_age: Duration) -> CacheHandle {
    CacheHandle::with_store(MemoryStore::new(), None, Some(max_age))
        .await
        .unwrap()
}

pub fn create_test_app(cache: CacheHandle) -> Router {
    router(CacheLayer::from(cache))
}

pub fn create_test_server(cache: CacheHandle) -> TestServer {
    TestServer::new(create_test_app(cache)).unwrap()
}
