use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::time::Instant;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::settings::IssuerConfig;
use crate::issuer::{TokenIssuer, TokenRequest};
use crate::observability::metrics::get_metrics;

static ERROR_MSG: &'static str = "error";
static STATUS_MSG: &'static str = "status";
static REJECTED_MSG: &'static str = "rejected";
static DECODE_MSG: &'static str = "decode";

/// Issuer reached over HTTP: `GET {base_url}{path}?grant_type=..&appid=..&secret=..`
#[derive(Debug, Clone)]
pub struct HttpIssuer {
    client: Client,
    base_url: Url,
}

impl HttpIssuer {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        // trailing slash keeps the last segment when joining `token`
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("invalid issuer base url '{}'", base_url))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(cfg: &IssuerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Self::new(client, &cfg.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Failure reason label travels with the error.
    async fn send(&self, url: Url, params: &TokenRequest) -> Result<Value, (&'static str, anyhow::Error)> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| (ERROR_MSG, anyhow!(e.without_url())))?;

        if !response.status().is_success() {
            return Err((STATUS_MSG, anyhow!("token request failed: {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| (DECODE_MSG, anyhow!("token response is not json: {}", e.without_url())))?;

        check_error_code(&body).map_err(|e| (REJECTED_MSG, e))?;
        Ok(body)
    }
}

#[async_trait]
impl TokenIssuer for HttpIssuer {
    async fn get(&self, path: &str, params: &TokenRequest) -> Result<Value> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        let url = self.base_url.join(path)?;
        metrics.issuer_requests.with_label_values(&[path]).inc();
        debug!("requesting token from {}", url);

        let result = self.send(url.clone(), params).await;

        metrics.issuer_duration.with_label_values(&[path]).observe(start.elapsed().as_secs_f64());
        result.map_err(|(reason, err)| {
            error!("token request to {} failed: {}", url, err);
            metrics.issuer_failures.with_label_values(&[reason]).inc();
            err
        })
    }
}

/// Issuers answer 200 with `{"errcode": .., "errmsg": ..}` when credentials are rejected.
fn check_error_code(body: &Value) -> Result<()> {
    match body.get("errcode").and_then(Value::as_i64) {
        Some(code) if code != 0 => {
            let message = body.get("errmsg").and_then(Value::as_str).unwrap_or("unknown error");
            Err(anyhow!("issuer rejected token request: errcode {}, {}", code, message))
        }
        _ => Ok(()),
    }
}
