//! Shared test doubles and request helpers.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use chatbot_api::AppState;
use chatbot_api::config::ApiConfig;
use chatbot_core::completion::config::CompletionConfig;
use chatbot_core::completion::{CompletionError, CompletionProvider, GenerationParams};
use chatbot_core::session::memory::MemorySessionStore;
use chatbot_core::session::{Session, SessionId, SessionStore, StoreError, Turn};
use chrono::{DateTime, Utc};
use tower::ServiceExt;

/// Memory store that counts every call and can be told to fail.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemorySessionStore,
    pub calls: AtomicUsize,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl SessionStore for CountingStore {
    async fn create(&self) -> Result<Session, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create().await
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        self.inner.find(id).await
    }

    async fn save_turns(
        &self,
        id: &SessionId,
        turns: &[Turn],
    ) -> Result<DateTime<Utc>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        self.inner.save_turns(id, turns).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StoreError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// Provider that answers "R1", "R2", ... and records what it was sent.
#[derive(Default)]
pub struct ScriptedProvider {
    pub seen: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedProvider {
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        turns: &[Turn],
        _params: &GenerationParams,
    ) -> Result<String, CompletionError> {
        let mut seen = self.seen.lock().unwrap();
        seen.push(turns.to_vec());
        Ok(format!("R{}", seen.len()))
    }
}

/// Provider that always fails with the given error text.
pub struct FailingProvider(pub String);

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(
        &self,
        _turns: &[Turn],
        _params: &GenerationParams,
    ) -> Result<String, CompletionError> {
        Err(CompletionError::Request(self.0.clone()))
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: String::new(),
        cors_allowed_origins: Vec::new(),
        completion: CompletionConfig::default(),
    }
}

pub fn app(store: Arc<dyn SessionStore>, provider: Arc<dyn CompletionProvider>) -> Router {
    app_with_config(store, provider, test_config())
}

pub fn app_with_config(
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn CompletionProvider>,
    config: ApiConfig,
) -> Router {
    chatbot_api::router(AppState::new(store, provider, config))
}

/// Send a request and return status plus the raw body.
pub async fn call_raw(app: &Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, body)
}

/// Send a request and return status plus parsed JSON body (`Null` when empty).
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = call_raw(app, req).await;
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("parse JSON")
    };
    (status, json)
}

pub async fn post_chat(app: &Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, req).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    call(app, req).await
}

/// `GET` without assuming a JSON body, for framework rejections.
pub async fn get_raw(app: &Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    call_raw(app, req).await
}
