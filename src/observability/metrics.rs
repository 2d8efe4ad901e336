use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;
use anyhow::Result;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Issuer metrics
    pub issuer_requests: IntCounterVec,
    pub issuer_failures: IntCounterVec,
    pub issuer_duration: HistogramVec,

    // Storage metrics
    pub storage_load_misses: IntCounterVec,
    pub storage_writes: IntCounterVec,

    // Cache metrics
    pub cache_hits: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenmanager".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Issuer
            issuer_requests: IntCounterVec::new(Opts::new("issuer_requests_total", "Token requests sent to the issuer"),&["path"],).unwrap(),
            issuer_failures: IntCounterVec::new(Opts::new("issuer_failures_total", "Issuer failures by reason"),&["reason"],).unwrap(),
            issuer_duration: HistogramVec::new(HistogramOpts::new("issuer_request_duration_seconds", "Issuer request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["path"],).unwrap(),

            // Storage
            storage_load_misses: IntCounterVec::new(Opts::new("storage_load_misses_total", "Storage loads that ended in a refresh"),&["backend", "reason"],).unwrap(),
            storage_writes: IntCounterVec::new(Opts::new("storage_writes_total", "Tokens persisted to storage"),&["backend"],).unwrap(),

            // Cache
            cache_hits: IntCounterVec::new(Opts::new("cache_hits_total", "Tokens served without an issuer call"),&["source"],).unwrap(),

            registry,
        });

        // Register metrics
        let r = &metrics.registry;
        r.register(Box::new(metrics.issuer_requests.clone())).unwrap();
        r.register(Box::new(metrics.issuer_failures.clone())).unwrap();
        r.register(Box::new(metrics.issuer_duration.clone())).unwrap();
        r.register(Box::new(metrics.storage_load_misses.clone())).unwrap();
        r.register(Box::new(metrics.storage_writes.clone())).unwrap();
        r.register(Box::new(metrics.cache_hits.clone())).unwrap();

        metrics
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
