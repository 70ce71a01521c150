use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::datetime;
use tower::ServiceExt;

use climasync_server::app::create_router;
use climasync_server::services::{HubConfig, HubService, ManualClock};

pub const START: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

pub struct MockApp {
    pub clock: Arc<ManualClock>,
    pub hub: Arc<HubService>,
    pub router: Router,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let hub = Arc::new(HubService::new(config, clock.clone()).unwrap());
        let router = create_router(hub.clone());

        Self { clock, hub, router }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri).method(method);
        let body = match body {
            Some(json) => {
                request = request.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send(Method::GET, uri, None).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, body) = self.send(Method::POST, uri, Some(body)).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send(Method::DELETE, uri, None).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}
