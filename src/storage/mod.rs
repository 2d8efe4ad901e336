//! Storage backends for issued tokens.
//!
//! A backend is picked once, when the manager is built:
//! - `File` keeps the whole issuer response as a JSON document
//! - `KeyValue` keeps only the bare token string

pub mod file_store;
pub mod key_value;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tracing::{debug, warn};

use crate::cache::token_data::TokenData;
use crate::config::settings::StorageConfig;
use crate::error::TokenResult;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{ACCESS_TOKEN_FIELD, STORAGE_FILE, STORAGE_KEY_VALUE};

pub use file_store::FileStore;
pub use key_value::{InMemoryKeyValueStore, KeyValueStore};

#[derive(Clone)]
pub enum TokenStorage {
    File(FileStore),
    KeyValue(Arc<dyn KeyValueStore>),
}

impl TokenStorage {
    pub fn file(path: impl Into<std::path::PathBuf>) -> Self {
        TokenStorage::File(FileStore::new(path))
    }

    pub fn key_value(store: Arc<dyn KeyValueStore>) -> Self {
        TokenStorage::KeyValue(store)
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        match cfg {
            StorageConfig::File { path } => TokenStorage::file(path),
            StorageConfig::Memory { token } => {
                let store = match token {
                    Some(token) => InMemoryKeyValueStore::with_token(token.to_owned()),
                    None => InMemoryKeyValueStore::new(),
                };
                TokenStorage::key_value(Arc::new(store))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TokenStorage::File(_) => STORAGE_FILE,
            TokenStorage::KeyValue(_) => STORAGE_KEY_VALUE,
        }
    }

    /// Read a previously persisted token.
    ///
    /// A missing file, unreadable or non-JSON content, a blank key-value entry
    /// or a backend error is a miss (`Ok(None)`) and the caller refreshes.
    /// A JSON document without a usable `access_token` is an error.
    pub async fn load(&self) -> TokenResult<Option<TokenData>> {
        let metrics = get_metrics().await;
        let loaded = match self {
            TokenStorage::File(store) => store.load().await,
            TokenStorage::KeyValue(store) => store.get_token().await.map(|token| {
                token
                    .filter(|token| !token.trim().is_empty())
                    .map(|token| json!({ (ACCESS_TOKEN_FIELD): token }))
            }),
        };

        match loaded {
            Ok(Some(value)) => {
                let data = TokenData::try_from(value).inspect_err(|_| {
                    metrics.storage_load_misses.with_label_values(&[self.kind(), "invalid"]).inc();
                })?;
                debug!("storage '{}': token loaded", self.kind());
                Ok(Some(data))
            }
            Ok(None) => {
                debug!("storage '{}': no token stored", self.kind());
                metrics.storage_load_misses.with_label_values(&[self.kind(), "empty"]).inc();
                Ok(None)
            }
            Err(err) => {
                warn!("storage '{}': unreadable token, refreshing: {:#}", self.kind(), err);
                metrics.storage_load_misses.with_label_values(&[self.kind(), "unreadable"]).inc();
                Ok(None)
            }
        }
    }

    /// Persist a fresh issuer response. File keeps all fields, key-value only the token.
    pub async fn persist(&self, data: &TokenData) -> Result<()> {
        match self {
            TokenStorage::File(store) => store.save(data).await?,
            TokenStorage::KeyValue(store) => store.set_token(data.access_token()).await?,
        }
        get_metrics().await.storage_writes.with_label_values(&[self.kind()]).inc();
        debug!("storage '{}': token persisted", self.kind());
        Ok(())
    }
}

impl fmt::Debug for TokenStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStorage::File(store) => f.debug_tuple("File").field(&store.path()).finish(),
            TokenStorage::KeyValue(_) => f.write_str("KeyValue"),
        }
    }
}
