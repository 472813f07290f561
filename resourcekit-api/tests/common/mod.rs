//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A router backed by `MemoryResourceStore`
//! - JWT token generation for arbitrary users
//! - Request helpers returning status and parsed JSON

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use resourcekit_api::app::{build_router, AppState};
use resourcekit_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use resourcekit_shared::auth::jwt::{create_token, Claims};
use resourcekit_shared::models::Resource;
use resourcekit_shared::store::{MemoryResourceStore, ResourceStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub store: MemoryResourceStore,
    pub app: Router,
}

impl TestContext {
    /// Creates a router over an empty in-memory store
    pub fn new() -> Self {
        let store = MemoryResourceStore::new();
        let state = AppState::new(Arc::new(store.clone()), test_config());

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request as `user` and returns the status and JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user_id) = user {
            builder = builder.header(header::AUTHORIZATION, bearer(user_id));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    /// Creates a resource through the API and returns it
    pub async fn create(&self, user: Uuid, body: Value) -> Resource {
        let (status, json) = self.send("POST", "/api/resources", Some(user), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        serde_json::from_value(json).unwrap()
    }

    /// Reads a row straight from the store, including soft-deleted rows
    pub async fn raw(&self, id: Uuid) -> Option<Resource> {
        self.store.find_any(id).await.unwrap()
    }
}

/// `Authorization` header value for `user_id`
pub fn bearer(user_id: Uuid) -> String {
    let token = create_token(&Claims::new(user_id), TEST_SECRET).unwrap();
    format!("Bearer {}", token)
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}
