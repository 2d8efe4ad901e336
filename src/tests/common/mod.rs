// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::issuer::{TokenIssuer, TokenRequest};
use crate::storage::KeyValueStore;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn token_content() -> Value {
    json!({"access_token": "12345", "expires_in": 7200})
}

/// Issuer double: answers with a scripted response and counts calls.
pub struct StubIssuer {
    response: Mutex<Result<Value, String>>,
    requests: Mutex<Vec<(String, TokenRequest)>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StubIssuer {
    pub fn returning(value: Value) -> Self {
        Self {
            response: Mutex::new(Ok(value)),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        let issuer = Self::returning(Value::Null);
        issuer.fail_with(message);
        issuer
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond_with(&self, value: Value) {
        *self.response.lock().unwrap() = Ok(value);
    }

    pub fn fail_with(&self, message: &str) {
        *self.response.lock().unwrap() = Err(message.to_owned());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, TokenRequest)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TokenIssuer for StubIssuer {
    async fn get(&self, path: &str, params: &TokenRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((path.to_owned(), params.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let response = self.response.lock().unwrap().clone();
        response.map_err(|message| anyhow!(message))
    }
}

/// Key-value backend whose reads always fail.
pub struct BrokenKeyValueStore {
    pub written: Mutex<Option<String>>,
}

impl BrokenKeyValueStore {
    pub fn new() -> Self {
        Self { written: Mutex::new(None) }
    }
}

#[async_trait]
impl KeyValueStore for BrokenKeyValueStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Err(anyhow!("connection refused"))
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        *self.written.lock().unwrap() = Some(token.to_owned());
        Ok(())
    }
}
